//! Client side of the remote data tables: the controller that decides when to
//! fetch, the gateway that performs the POST, the table catalog and the
//! presentation helpers used by views.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod gateway;
pub mod view;

pub use catalog::{columns_for, endpoint_url};
pub use config::{load_settings, Settings};
pub use controller::{
    page_count, ControllerPhase, ControllerSettings, RemoteTableController, Settlement,
};
pub use gateway::{FetchGateway, HttpFetchGateway};
