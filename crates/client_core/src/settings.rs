use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "roster.toml";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_STATUS_HIDE_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    /// How long a status message stays visible before it is hidden again.
    pub status_hide_after: Duration,
    /// Per-request HTTP timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            status_hide_after: DEFAULT_STATUS_HIDE_AFTER,
            request_timeout: None,
        }
    }
}

impl ClientSettings {
    pub fn with_server_url(mut self, server_url: impl AsRef<str>) -> Self {
        self.server_url = normalize_server_url(server_url.as_ref());
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server_url: Option<String>,
    status_hide_after_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
}

/// Defaults, then `roster.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<SettingsFile>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => warn!(
                path = %path.display(),
                "settings: ignoring unreadable settings file: {err}"
            ),
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: SettingsFile) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = normalize_server_url(&v);
    }
    if let Some(ms) = file_cfg.status_hide_after_ms {
        settings.status_hide_after = Duration::from_millis(ms);
    }
    if let Some(ms) = file_cfg.request_timeout_ms {
        settings.request_timeout = timeout_from_millis(ms);
    }
}

fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ROSTER_SERVER_URL") {
        settings.server_url = normalize_server_url(&v);
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = normalize_server_url(&v);
    }

    if let Some(v) = lookup("APP__STATUS_HIDE_AFTER_MS") {
        match v.trim().parse::<u64>() {
            Ok(ms) => settings.status_hide_after = Duration::from_millis(ms),
            Err(err) => warn!("settings: ignoring APP__STATUS_HIDE_AFTER_MS={v:?}: {err}"),
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_MS") {
        match v.trim().parse::<u64>() {
            Ok(ms) => settings.request_timeout = timeout_from_millis(ms),
            Err(err) => warn!("settings: ignoring APP__REQUEST_TIMEOUT_MS={v:?}: {err}"),
        }
    }
}

// 0 disables the timeout.
fn timeout_from_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

pub fn normalize_server_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
