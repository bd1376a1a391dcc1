use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_path(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("roster_settings_{tag}_{suffix}.toml"))
}

#[test]
fn normalizes_trailing_slashes_and_blank_urls() {
    assert_eq!(
        normalize_server_url(" http://school.test:8000/ "),
        "http://school.test:8000"
    );
    assert_eq!(
        normalize_server_url("http://school.test/api//"),
        "http://school.test/api"
    );
    assert_eq!(normalize_server_url("   "), DEFAULT_SERVER_URL);
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(&temp_settings_path("missing"));
    assert_eq!(settings.status_hide_after, Duration::from_secs(5));
    assert_eq!(settings.request_timeout, None);
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_path("file");
    fs::write(
        &path,
        "server_url = \"http://roster.test/\"\nstatus_hide_after_ms = 2500\nrequest_timeout_ms = 10000\n",
    )
    .expect("write settings");

    let mut settings = ClientSettings::default();
    let raw = fs::read_to_string(&path).expect("read settings");
    apply_file_settings(&mut settings, toml::from_str(&raw).expect("parse settings"));
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.server_url, "http://roster.test");
    assert_eq!(settings.status_hide_after, Duration::from_millis(2500));
    assert_eq!(settings.request_timeout, Some(Duration::from_secs(10)));
}

#[test]
fn env_overrides_win_and_bad_numbers_are_ignored() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("ROSTER_SERVER_URL", "http://first.test"),
        ("APP__SERVER_URL", "http://second.test/"),
        ("APP__STATUS_HIDE_AFTER_MS", "soon"),
        ("APP__REQUEST_TIMEOUT_MS", "0"),
    ]);
    let mut settings = ClientSettings {
        request_timeout: Some(Duration::from_secs(3)),
        ..ClientSettings::default()
    };

    apply_env_overrides(&mut settings, |name| vars.get(name).map(|v| v.to_string()));

    assert_eq!(settings.server_url, "http://second.test");
    assert_eq!(settings.status_hide_after, DEFAULT_STATUS_HIDE_AFTER);
    assert_eq!(settings.request_timeout, None);
}
