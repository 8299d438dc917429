//! Backend worker: owns the tokio runtime and runs every queued fetch as its
//! own task, so settlements reach the UI in completion order.

use std::{collections::HashMap, sync::Arc, thread};

use client_core::FetchGateway;
use crossbeam_channel::{Receiver, Sender};
use shared::{domain::TableKind, error::TableError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub type Gateways = HashMap<TableKind, Arc<dyn FetchGateway>>;

pub fn launch(
    gateways: Gateways,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.send(UiEvent::BackendReady);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Fetch { table, request } => {
                        let ui_tx = ui_tx.clone();
                        let gateway = gateways.get(&table).cloned();
                        tokio::spawn(async move {
                            let outcome = match gateway {
                                Some(gateway) => gateway.fetch(&request).await,
                                None => Err(TableError::app(format!(
                                    "no endpoint configured for {table:?}"
                                ))),
                            };
                            let _ = ui_tx.send(UiEvent::FetchSettled {
                                table,
                                request_id: request.request_id,
                                outcome,
                            });
                        });
                    }
                }
            }
            tracing::info!("ui command channel closed; backend worker stopping");
        });
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use crossbeam_channel::bounded;
    use shared::{
        domain::RequestId,
        protocol::{FetchRequest, TablePage},
        query::TableQuery,
    };

    use super::*;

    /// Answers after `delay_ms` milliseconds, as given by the request's offset.
    struct DelayedGateway;

    #[async_trait]
    impl FetchGateway for DelayedGateway {
        async fn fetch(&self, request: &FetchRequest) -> Result<TablePage, TableError> {
            tokio::time::sleep(Duration::from_millis(request.body.offset)).await;
            Ok(TablePage {
                fetch_id: None,
                rows: Vec::new(),
                total_count: request.body.offset,
                filtered_count: request.body.offset,
            })
        }
    }

    fn request(id: u64, delay_ms: u64) -> FetchRequest {
        let mut query = TableQuery::with_page_size(delay_ms.max(1));
        query.page_index = u64::from(delay_ms > 0);
        FetchRequest::build(RequestId(id), &query, &[])
    }

    fn next_event(ui_rx: &Receiver<UiEvent>) -> UiEvent {
        ui_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("backend event")
    }

    #[test]
    fn fetches_settle_in_completion_order() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let mut gateways: Gateways = HashMap::new();
        gateways.insert(TableKind::Customers, Arc::new(DelayedGateway));
        let worker = launch(gateways, cmd_rx, ui_tx);

        assert!(matches!(next_event(&ui_rx), UiEvent::BackendReady));

        cmd_tx
            .send(BackendCommand::Fetch {
                table: TableKind::Customers,
                request: request(1, 300),
            })
            .expect("send slow");
        cmd_tx
            .send(BackendCommand::Fetch {
                table: TableKind::Customers,
                request: request(2, 0),
            })
            .expect("send fast");

        let order: Vec<RequestId> = (0..2)
            .map(|_| match next_event(&ui_rx) {
                UiEvent::FetchSettled { request_id, .. } => request_id,
                _ => panic!("unexpected event"),
            })
            .collect();
        assert_eq!(order, vec![RequestId(2), RequestId(1)]);

        drop(cmd_tx);
        worker.join().expect("worker exits");
    }

    #[test]
    fn missing_gateway_settles_as_error() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let worker = launch(HashMap::new(), cmd_rx, ui_tx);
        assert!(matches!(next_event(&ui_rx), UiEvent::BackendReady));

        cmd_tx
            .send(BackendCommand::Fetch {
                table: TableKind::Films,
                request: request(5, 0),
            })
            .expect("send");

        match next_event(&ui_rx) {
            UiEvent::FetchSettled {
                table,
                request_id,
                outcome,
            } => {
                assert_eq!(table, TableKind::Films);
                assert_eq!(request_id, RequestId(5));
                assert!(outcome.is_err());
            }
            _ => panic!("unexpected event"),
        }

        drop(cmd_tx);
        worker.join().expect("worker exits");
    }
}
