//! Backend commands queued from UI to backend worker.

use shared::{domain::TableKind, protocol::FetchRequest};

pub enum BackendCommand {
    Fetch {
        table: TableKind,
        request: FetchRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Fetch { .. } => "fetch",
        }
    }
}
