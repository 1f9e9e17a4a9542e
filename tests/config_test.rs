//! Configuration loading tests.
//!
//! These point `HOME` at a temp directory and set `WEFT_*` variables,
//! so every test runs serialized.

use std::fs;

use serial_test::serial;
use tempfile::TempDir;
use weft::ClientConfig;

const ENV_VARS: &[&str] = &[
    "WEFT_BASE_URL",
    "WEFT_ACCESS_TOKEN",
    "WEFT_TIMEOUT_SECS",
    "WEFT_LOG",
];

/// Point HOME at a fresh temp dir and clear all WEFT_* variables.
fn isolated_home() -> TempDir {
    let home = TempDir::new().expect("temp home");
    std::env::set_var("HOME", home.path());
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
    home
}

fn write_config_file(home: &TempDir, contents: &str) {
    let dir = home.path().join(".weft");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.json"), contents).unwrap();
}

#[test]
#[serial]
fn test_load_defaults_when_no_file() {
    let _home = isolated_home();

    let config = ClientConfig::load().unwrap();
    assert_eq!(config, ClientConfig::default());
}

#[test]
#[serial]
fn test_load_reads_config_file() {
    let home = isolated_home();
    write_config_file(
        &home,
        r#"{
            "base_url": "https://loom.example",
            "access_token": "tok-from-file",
            "request_timeout_secs": 45
        }"#,
    );

    let config = ClientConfig::load().unwrap();
    assert_eq!(config.base_url, "https://loom.example");
    assert_eq!(config.access_token, "tok-from-file");
    assert_eq!(config.request_timeout_secs, 45);
    assert_eq!(config.log_filter, None);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let home = isolated_home();
    write_config_file(
        &home,
        r#"{"base_url": "https://file.example", "access_token": "tok-from-file"}"#,
    );
    std::env::set_var("WEFT_BASE_URL", "https://env.example");
    std::env::set_var("WEFT_TIMEOUT_SECS", "5");
    std::env::set_var("WEFT_LOG", "weft=trace");

    let config = ClientConfig::load().unwrap();
    assert_eq!(config.base_url, "https://env.example");
    // Untouched fields keep the file's values
    assert_eq!(config.access_token, "tok-from-file");
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.log_filter.as_deref(), Some("weft=trace"));
}

#[test]
#[serial]
fn test_unparsable_timeout_env_is_ignored() {
    let _home = isolated_home();
    std::env::set_var("WEFT_TIMEOUT_SECS", "soon");

    let config = ClientConfig::load().unwrap();
    assert_eq!(
        config.request_timeout_secs,
        ClientConfig::default().request_timeout_secs
    );
}

#[test]
#[serial]
fn test_malformed_config_file_is_an_error() {
    let home = isolated_home();
    write_config_file(&home, "{not json");

    assert!(ClientConfig::load().is_err());
}

#[test]
#[serial]
fn test_config_path_under_home() {
    let home = isolated_home();

    let path = ClientConfig::config_path().unwrap();
    assert_eq!(path, home.path().join(".weft").join("config.json"));
}

#[test]
#[serial]
fn test_loaded_config_validates_with_token() {
    let home = isolated_home();
    write_config_file(
        &home,
        r#"{"base_url": "https://loom.example", "access_token": "tok"}"#,
    );

    let config = ClientConfig::load().unwrap();
    assert!(config.validate().is_ok());
}
