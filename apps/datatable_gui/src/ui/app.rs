use std::time::{Duration, Instant};

use client_core::controller::ControllerSettings;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::TableKind;
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{home::show_home, table_view::TableScreen};

const IDLE_REPAINT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Table(TableKind),
}

pub struct DatatableApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    api_base_url: Url,
    page: Page,
    tables: Vec<TableScreen>,
    status: String,
}

impl DatatableApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        api_base_url: Url,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            api_base_url,
            page: Page::Home,
            tables: TableKind::ALL
                .into_iter()
                .map(|kind| TableScreen::new(kind, settings))
                .collect(),
            status: "Starting backend".to_string(),
        }
    }

    fn table_mut(&mut self, kind: TableKind) -> Option<&mut TableScreen> {
        self.tables.iter_mut().find(|table| table.kind() == kind)
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendReady => {
                    self.status = "Ready".to_string();
                }
                UiEvent::BackendFailed(message) => {
                    tracing::error!("{message}");
                    self.status = message;
                }
                UiEvent::FetchSettled {
                    table,
                    request_id,
                    outcome,
                } => {
                    if let Some(screen) = self.table_mut(table) {
                        screen.apply_settlement(request_id, outcome);
                    }
                }
            }
        }
    }

    fn poll_tables(&mut self, now: Instant) {
        for table in &mut self.tables {
            table.poll(&self.cmd_tx, now);
        }
    }

    fn repaint_delay(&self, now: Instant) -> Duration {
        self.tables
            .iter()
            .filter_map(TableScreen::next_deadline)
            .map(|deadline| deadline.saturating_duration_since(now))
            .fold(IDLE_REPAINT, Duration::min)
    }

    fn show_nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_nav_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.page, Page::Home, "Home");
                for kind in TableKind::ALL {
                    ui.selectable_value(&mut self.page, Page::Table(kind), kind.nav_label());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.status.as_str());
                });
            });
        });
    }
}

impl eframe::App for DatatableApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.poll_tables(Instant::now());

        self.show_nav(ctx);

        let page = self.page;
        egui::CentralPanel::default().show(ctx, |ui| match page {
            Page::Home => show_home(ui, &self.api_base_url),
            Page::Table(kind) => {
                let cmd_tx = self.cmd_tx.clone();
                if let Some(screen) = self.table_mut(kind) {
                    screen.ensure_started(&cmd_tx, Instant::now());
                    screen.show(ui, &cmd_tx);
                }
            }
        });

        ctx.request_repaint_after(self.repaint_delay(Instant::now()));
    }
}
