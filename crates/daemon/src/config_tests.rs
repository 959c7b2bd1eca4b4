// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
fn absent_file_yields_defaults() {
    let settings = load_settings(Some(Path::new("/nonexistent/skiff.toml"))).unwrap();
    assert_eq!(settings.dinghy_filename, "dinghyfile");
}

#[test]
fn no_path_yields_defaults() {
    let settings = load_settings(None).unwrap();
    assert_eq!(settings.template_repo, "dinghy-templates");
}

#[test]
fn file_overlays_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        dinghy_filename = "Pipelinefile"
        template_org = "armory"
        delete_stale_pipelines = true
        "#,
    )
    .unwrap();

    let settings = load_settings(Some(&path)).unwrap();
    assert_eq!(settings.dinghy_filename, "Pipelinefile");
    assert_eq!(settings.template_org, "armory");
    assert!(settings.delete_stale_pipelines);
    // untouched fields keep their defaults
    assert_eq!(settings.github_endpoint, "https://api.github.com");
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "not [valid toml").unwrap();

    assert!(matches!(
        load_settings(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
#[serial]
fn env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, r#"github_token = "from-file""#).unwrap();

    std::env::set_var("SKIFF_GITHUB_TOKEN", "from-env");
    let settings = load_settings(Some(&path)).unwrap();
    std::env::remove_var("SKIFF_GITHUB_TOKEN");

    assert_eq!(settings.github_token, "from-env");
}

#[test]
#[serial]
fn env_sets_optional_fields() {
    std::env::set_var("SKIFF_EVENTS_URL", "http://echo:8089");
    std::env::set_var("SKIFF_STORE_PATH", "/var/lib/skiff/deps.json");
    let settings = load_settings(None).unwrap();
    std::env::remove_var("SKIFF_EVENTS_URL");
    std::env::remove_var("SKIFF_STORE_PATH");

    assert_eq!(settings.events_url.as_deref(), Some("http://echo:8089"));
    assert_eq!(
        settings.store_path,
        Some(PathBuf::from("/var/lib/skiff/deps.json"))
    );
}
