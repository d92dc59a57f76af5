//! Configuration loading and validation tests.

use std::fs;
use std::path::PathBuf;

use cmp_bridge::config::{load_config, ConfigError};

fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cmp-bridge-test-{}-{}.toml", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_valid_config_file() {
    let path = write_temp_config(
        "valid",
        r#"
            [listener]
            bind_address = "127.0.0.1:7100"

            [upstream]
            uri = "https://ca.example.com/pkix/"
            transcode = true
        "#,
    );

    let config = load_config(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.listener.bind_address, "127.0.0.1:7100");
    assert_eq!(config.listener.max_connections, 30);
    assert_eq!(config.upstream.uri, "https://ca.example.com/pkix/");
    assert!(config.upstream.transcode);
}

#[test]
fn rejects_invalid_upstream_uri() {
    let path = write_temp_config(
        "bad-uri",
        r#"
            [upstream]
            uri = "not a uri"
        "#,
    );

    let err = load_config(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, ConfigError::InvalidUri { .. }));
}

#[test]
fn rejects_non_http_scheme() {
    let path = write_temp_config(
        "bad-scheme",
        r#"
            [upstream]
            uri = "ftp://ca.example.com/"
        "#,
    );

    let err = load_config(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, ConfigError::UnsupportedScheme(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_config(std::path::Path::new("/nonexistent/cmp-bridge.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn rejects_malformed_toml() {
    let path = write_temp_config("bad-toml", "[listener\nbind_address = ");

    let err = load_config(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, ConfigError::Parse(_)));
}
