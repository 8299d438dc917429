//! One remote table screen: header with sort toggles and filter inputs, the
//! current page of rows, the summary row, pagination bar and modals.

use std::time::Instant;

use client_core::{
    catalog::columns_for,
    controller::{ControllerSettings, RemoteTableController, Settlement},
    view::{
        page_label, pagination_controls, parse_page_input, sort_marker, summary_line, PageControl,
        FETCH_ERROR_MODAL, LOADING_LABEL, PAGE_SIZE_OPTIONS,
    },
};
use crossbeam_channel::Sender;
use eframe::egui;
use shared::{
    columns::{ColumnDescriptor, FilterInput},
    domain::{RequestId, TableKind},
    error::TableError,
    protocol::{FetchRequest, TablePage},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::orchestration::dispatch_fetch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    GotoPage(u64),
    SetPageSize(u64),
    ToggleSort { column_id: String, multi: bool },
    SetFilter { column_id: String, value: Option<String> },
    CloseErrorModal,
}

pub struct TableScreen {
    kind: TableKind,
    controller: RemoteTableController,
    page_input: String,
    error_modal_open: bool,
    started: bool,
}

impl TableScreen {
    pub fn new(kind: TableKind, settings: ControllerSettings) -> Self {
        Self {
            kind,
            controller: RemoteTableController::new(columns_for(kind), settings),
            page_input: "1".to_string(),
            error_modal_open: false,
            started: false,
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn controller(&self) -> &RemoteTableController {
        &self.controller
    }

    pub fn error_modal_open(&self) -> bool {
        self.error_modal_open
    }

    /// Issues the first fetch the first time the screen is shown.
    pub fn ensure_started(&mut self, cmd_tx: &Sender<BackendCommand>, now: Instant) {
        if self.started {
            return;
        }
        self.started = true;
        let request = self.controller.start(now);
        self.dispatch(cmd_tx, request);
    }

    pub fn poll(&mut self, cmd_tx: &Sender<BackendCommand>, now: Instant) {
        let request = self.controller.poll(now);
        self.dispatch(cmd_tx, request);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    pub fn apply_settlement(
        &mut self,
        request_id: RequestId,
        outcome: Result<TablePage, TableError>,
    ) -> Settlement {
        let settlement = self.controller.settle(request_id, outcome);
        if settlement == Settlement::Committed && self.controller.result().error().is_some() {
            self.error_modal_open = true;
        }
        settlement
    }

    pub fn apply(&mut self, action: TableAction, cmd_tx: &Sender<BackendCommand>, now: Instant) {
        let request = match action {
            TableAction::GotoPage(page_index) => self.controller.goto_page(page_index, now),
            TableAction::SetPageSize(page_size) => self.controller.set_page_size(page_size, now),
            TableAction::ToggleSort { column_id, multi } => {
                self.controller.toggle_sort(&column_id, multi, now)
            }
            TableAction::SetFilter { column_id, value } => {
                self.controller.set_filter(&column_id, value, now)
            }
            TableAction::CloseErrorModal => {
                self.error_modal_open = false;
                None
            }
        };
        self.dispatch(cmd_tx, request);
    }

    fn dispatch(&mut self, cmd_tx: &Sender<BackendCommand>, request: Option<FetchRequest>) {
        let Some(request) = request else {
            return;
        };
        let request_id = request.request_id;
        if let Err(err) = dispatch_fetch(cmd_tx, self.kind, request) {
            tracing::warn!(table = ?self.kind, request_id = request_id.0, "failed to queue fetch: {err}");
            self.apply_settlement(request_id, Err(err));
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, cmd_tx: &Sender<BackendCommand>) {
        let mut actions = Vec::new();

        ui.heading(self.kind.title());
        ui.add_space(6.0);

        egui::ScrollArea::both()
            .id_salt(("table_rows", self.kind.nav_label()))
            .max_height(ui.available_height() - 72.0)
            .show(ui, |ui| {
                self.show_grid(ui, &mut actions);
            });

        ui.separator();
        ui.label(summary_line(
            self.controller.query(),
            self.controller.result(),
            self.controller.loading(),
        ));
        ui.add_space(4.0);
        self.show_pagination(ui, &mut actions);
        self.show_modals(ui.ctx(), &mut actions);

        let now = Instant::now();
        for action in actions {
            self.apply(action, cmd_tx, now);
        }
    }

    fn show_grid(&self, ui: &mut egui::Ui, actions: &mut Vec<TableAction>) {
        let columns = self.controller.columns();
        let query = self.controller.query();

        egui::Grid::new(("table_grid", self.kind.nav_label()))
            .striped(true)
            .min_col_width(80.0)
            .show(ui, |ui| {
                for column in columns {
                    ui.vertical(|ui| {
                        show_header(ui, column, query.sort_direction(&column.id), actions);
                        if column.can_filter {
                            show_filter(ui, column, query.filter_value(&column.id), actions);
                        }
                    });
                }
                ui.end_row();

                for record in self.controller.result().rows() {
                    for column in columns {
                        ui.label(column.cell_text(record));
                    }
                    ui.end_row();
                }
            });
    }

    fn show_pagination(&mut self, ui: &mut egui::Ui, actions: &mut Vec<TableAction>) {
        let page_index = self.controller.query().page_index;
        let page_size = self.controller.query().page_size;
        let page_count = self.controller.page_count();

        ui.horizontal_wrapped(|ui| {
            for control in pagination_controls(page_index, page_count) {
                let label = control.label();
                let clicked = match control {
                    PageControl::Ellipsis => {
                        ui.add_enabled(false, egui::Button::new(label));
                        false
                    }
                    PageControl::Page { active: true, .. } => {
                        ui.add(egui::Button::new(label).selected(true));
                        false
                    }
                    _ => ui
                        .add_enabled(control.target().is_some(), egui::Button::new(label))
                        .clicked(),
                };
                if let (true, Some(target)) = (clicked, control.target()) {
                    actions.push(TableAction::GotoPage(target));
                }
            }

            ui.add_space(8.0);
            ui.label(page_label(page_index, page_count));

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.page_input).desired_width(48.0),
            );
            if response.changed() {
                if let Some(target) = parse_page_input(&self.page_input) {
                    actions.push(TableAction::GotoPage(target));
                }
            }
            if !response.has_focus() {
                self.page_input = (page_index + 1).to_string();
            }

            let mut selected = page_size;
            egui::ComboBox::from_id_salt(("page_size", self.kind.nav_label()))
                .selected_text(format!("Show {page_size}"))
                .show_ui(ui, |ui| {
                    for option in PAGE_SIZE_OPTIONS {
                        ui.selectable_value(&mut selected, option, format!("Show {option}"));
                    }
                });
            if selected != page_size {
                actions.push(TableAction::SetPageSize(selected));
            }
        });
    }

    fn show_modals(&self, ctx: &egui::Context, actions: &mut Vec<TableAction>) {
        if self.controller.loading() {
            egui::Modal::new(egui::Id::new(("loading_modal", self.kind.nav_label()))).show(
                ctx,
                |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(LOADING_LABEL);
                    });
                },
            );
        } else if self.error_modal_open {
            let modal = egui::Modal::new(egui::Id::new(("error_modal", self.kind.nav_label())))
                .show(ctx, |ui| {
                    ui.label(FETCH_ERROR_MODAL);
                    if let Some(error) = self.controller.result().error() {
                        ui.small(error);
                    }
                    ui.add_space(8.0);
                    ui.button("Close").clicked()
                });
            if modal.inner || modal.should_close() {
                actions.push(TableAction::CloseErrorModal);
            }
        }
    }
}

fn show_header(
    ui: &mut egui::Ui,
    column: &ColumnDescriptor,
    direction: Option<shared::domain::SortDirection>,
    actions: &mut Vec<TableAction>,
) {
    if !column.can_sort {
        ui.strong(column.header.as_str());
        return;
    }

    let text = format!("{} {}", sort_marker(direction), column.header);
    let response = ui
        .add(egui::Button::new(egui::RichText::new(text).strong()).frame(false))
        .on_hover_text(format!("Toggle sort by {}", column.header));
    if response.clicked() {
        let multi = ui.input(|input| input.modifiers.shift);
        actions.push(TableAction::ToggleSort {
            column_id: column.id.clone(),
            multi,
        });
    }
}

fn show_filter(
    ui: &mut egui::Ui,
    column: &ColumnDescriptor,
    current: Option<&str>,
    actions: &mut Vec<TableAction>,
) {
    match &column.filter_input {
        FilterInput::Text => {
            let mut draft = current.unwrap_or_default().to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut draft)
                    .hint_text(column.placeholder())
                    .desired_width(120.0),
            );
            if response.changed() {
                actions.push(TableAction::SetFilter {
                    column_id: column.id.clone(),
                    value: Some(draft),
                });
            }
        }
        FilterInput::Select(options) => {
            let selected_label = options
                .iter()
                .find(|option| option.value.as_deref() == current)
                .map_or("*", |option| option.label.as_str());
            let mut selected = current.map(str::to_string);
            egui::ComboBox::from_id_salt(("filter_select", column.id.as_str()))
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    for option in options {
                        ui.selectable_value(&mut selected, option.value.clone(), option.label.as_str());
                    }
                });
            if selected.as_deref() != current {
                actions.push(TableAction::SetFilter {
                    column_id: column.id.clone(),
                    value: selected,
                });
            }
        }
    }
}
