use std::{collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use client_core::{
    config::{load_settings, load_settings_with},
    endpoint_url, FetchGateway, HttpFetchGateway,
};
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::TableKind;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::events::UiEvent;
use ui::DatatableApp;

const APP_TITLE: &str = "Remote Data Tables";

#[derive(Parser, Debug)]
struct Args {
    /// Settings file (defaults to ./datatable.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the table API, overriding settings and environment.
    #[arg(long)]
    api_base_url: Option<String>,
    /// Origin used when no API base URL is configured.
    #[arg(long)]
    origin: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_with(path, |name| std::env::var(name).ok()),
        None => load_settings(),
    };
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = Some(api_base_url);
    }
    if let Some(origin) = args.origin {
        settings.origin = origin;
    }

    let api_base_url = settings.resolve_api_base_url()?;
    let mut gateways: runtime::Gateways = HashMap::new();
    for kind in TableKind::ALL {
        let endpoint = endpoint_url(&api_base_url, kind)?;
        tracing::info!(table = ?kind, %endpoint, "configured table endpoint");
        gateways.insert(
            kind,
            Arc::new(HttpFetchGateway::new(endpoint)) as Arc<dyn FetchGateway>,
        );
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(gateways, cmd_rx, ui_tx);

    let controller_settings = settings.controller_settings();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DatatableApp::new(
                cmd_tx,
                ui_rx,
                api_base_url,
                controller_settings,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
    .context("desktop window failed")
}
