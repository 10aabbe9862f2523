use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use client_core::transport::{DEFAULT_PLOT_PATH, DEFAULT_UPLOAD_PATH};
use shared::domain::DisplayUnit;
use tracing::warn;

pub const CONFIG_FILE: &str = "pathgauge.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub upload_path: String,
    pub plot_path: String,
    pub default_unit: DisplayUnit,
    pub request_timeout_secs: Option<u64>,
    pub plot_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            upload_path: DEFAULT_UPLOAD_PATH.into(),
            plot_path: DEFAULT_PLOT_PATH.into(),
            default_unit: DisplayUnit::Millimeters,
            request_timeout_secs: None,
            plot_dir: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Defaults, then `pathgauge.toml` in the working directory, then the
/// environment. Command-line flags are applied by the caller.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(file = CONFIG_FILE, %error, "ignoring unreadable config file");
            return;
        }
    };

    for (key, value) in file_cfg {
        let value = match value {
            toml::Value::String(v) => v,
            other => other.to_string(),
        };
        apply_value(settings, &key, value);
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in [
        "server_url",
        "upload_path",
        "plot_path",
        "default_unit",
        "request_timeout_secs",
        "plot_dir",
    ] {
        let upper = key.to_ascii_uppercase();
        if let Some(v) = lookup(&format!("PATHGAUGE_{upper}")) {
            apply_value(settings, key, v);
        }
        if let Some(v) = lookup(&format!("APP__{upper}")) {
            apply_value(settings, key, v);
        }
    }
}

fn apply_value(settings: &mut Settings, key: &str, value: String) {
    match key {
        "server_url" => settings.server_url = value,
        "upload_path" => settings.upload_path = value,
        "plot_path" => settings.plot_path = value,
        "default_unit" => match value.parse::<DisplayUnit>() {
            Ok(unit) => settings.default_unit = unit,
            Err(error) => warn!(%error, "ignoring default_unit setting"),
        },
        "request_timeout_secs" => match value.trim().parse::<u64>() {
            Ok(secs) => settings.request_timeout_secs = Some(secs),
            Err(_) => warn!(%value, "ignoring non-numeric request_timeout_secs"),
        },
        "plot_dir" => settings.plot_dir = Some(PathBuf::from(value)),
        other => warn!(key = other, "ignoring unknown setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
