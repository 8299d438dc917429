//! UI layer: app shell with navigation, the home page and the table screens.

pub mod app;
pub mod home;
pub mod table_view;

pub use app::DatatableApp;
