//! Hands issued fetches from table views to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::{domain::TableKind, error::TableError, protocol::FetchRequest};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a fetch for the backend worker. A request that cannot be queued is
/// returned as an error so the view can settle it instead of spinning forever.
pub fn dispatch_fetch(
    cmd_tx: &Sender<BackendCommand>,
    table: TableKind,
    request: FetchRequest,
) -> Result<(), TableError> {
    let request_id = request.request_id;
    let cmd = BackendCommand::Fetch { table, request };
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(
                command = cmd_name,
                table = ?table,
                request_id = request_id.0,
                "queued ui->backend command"
            );
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(TableError::app(
            "UI command queue is full; please retry",
        )),
        Err(TrySendError::Disconnected(_)) => Err(TableError::network(
            "Backend worker disconnected (possible startup/runtime failure)",
        )),
    }
}
