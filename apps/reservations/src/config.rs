use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "reservations.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".into(),
            request_timeout_secs: 30,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the config file, then environment overrides.
///
/// An explicit `config_path` must exist; the default file is optional.
/// Also returns notes about ignored values, to be logged once tracing is up.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<(Settings, Vec<String>)> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    let notes = apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok((settings, notes))
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut notes = Vec::new();

    if let Some(v) = lookup("RESERVATIONS_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("RESERVATIONS_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => notes.push(format!("ignoring invalid RESERVATIONS_TIMEOUT_SECS={v:?}")),
        }
    }

    if let Some(v) = lookup("RESERVATIONS_LOG") {
        settings.log_filter = v;
    }

    notes
}
