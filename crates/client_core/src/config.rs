use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::query::DEFAULT_PAGE_SIZE;
use url::Url;

use crate::controller::ControllerSettings;

pub const SETTINGS_FILE: &str = "datatable.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_base_url: Option<String>,
    pub origin: String,
    pub fetch_delay_ms: u64,
    pub default_page_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            origin: "http://127.0.0.1:8080".into(),
            fetch_delay_ms: 1000,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            debounce_window: self.fetch_delay(),
            page_size: self.default_page_size.max(1),
        }
    }

    /// The configured override when present, else the origin reduced to
    /// `scheme://host[:port]`.
    pub fn resolve_api_base_url(&self) -> anyhow::Result<Url> {
        if let Some(raw) = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
        {
            return Url::parse(raw).with_context(|| format!("invalid api base url '{raw}'"));
        }

        let origin = Url::parse(self.origin.trim())
            .with_context(|| format!("invalid origin '{}'", self.origin))?;
        let origin = origin.origin();
        if !origin.is_tuple() {
            bail!("origin '{}' has no scheme/host to derive an api url from", self.origin);
        }
        Url::parse(&origin.ascii_serialization())
            .with_context(|| format!("invalid origin '{}'", self.origin))
    }
}

pub fn load_settings() -> Settings {
    load_settings_with(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => apply_file_overrides(&mut settings, &file_cfg),
            Err(err) => tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}"),
        }
    }

    apply_env_overrides(&mut settings, env);
    settings
}

fn apply_file_overrides(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("api_base_url") {
        settings.api_base_url = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("origin") {
        settings.origin = v.clone();
    }
    if let Some(parsed) = file_cfg.get("fetch_delay_ms").and_then(|v| v.parse().ok()) {
        settings.fetch_delay_ms = parsed;
    }
    if let Some(parsed) = file_cfg
        .get("default_page_size")
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|size| *size > 0)
    {
        settings.default_page_size = parsed;
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("API_BASE_URL") {
        settings.api_base_url = Some(v);
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = Some(v);
    }

    if let Some(v) = env("APP__ORIGIN") {
        settings.origin = v;
    }

    if let Some(parsed) = env("APP__FETCH_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.fetch_delay_ms = parsed;
    }

    if let Some(parsed) = env("APP__DEFAULT_PAGE_SIZE")
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|size| *size > 0)
    {
        settings.default_page_size = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
