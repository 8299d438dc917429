//! Backend to UI events.

use shared::{
    domain::{RequestId, TableKind},
    error::TableError,
    protocol::TablePage,
};

pub enum UiEvent {
    BackendReady,
    BackendFailed(String),
    FetchSettled {
        table: TableKind,
        request_id: RequestId,
        outcome: Result<TablePage, TableError>,
    },
}
