//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading tenant configuration from files.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use wxkit_domain::WxError;
use wxkit_infra::config;

/// Write `contents` next to a temp file, under the given extension.
fn write_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}

#[test]
fn test_load_config_from_json_file() {
    let (_guard, path) = write_config(
        r#"{
            "app_id": "wx-json",
            "app_secret": "json-secret",
            "lang": "en",
            "hydration_concurrency": 4
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load JSON config");

    assert_eq!(config.app_id, "wx-json");
    assert_eq!(config.app_secret, "json-secret");
    assert_eq!(config.lang, "en");
    assert_eq!(config.hydration_concurrency, 4);
    // Unset fields keep their defaults
    assert_eq!(config.api_base_url, "https://api.weixin.qq.com");
    assert_eq!(config.max_attempts, 1);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let (_guard, path) = write_config(
        r#"
app_id = "wx-toml"
app_secret = "toml-secret"
api_base_url = "http://127.0.0.1:9000"
timeout_secs = 5
max_attempts = 3
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load TOML config");

    assert_eq!(config.app_id, "wx-toml");
    assert_eq!(config.api_base(), "http://127.0.0.1:9000");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.max_attempts, 3);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_rejects_missing_secret() {
    let (_guard, path) = write_config(r#"{"app_id": "wx-json", "app_secret": ""}"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(WxError::Config(_))), "empty secret must be rejected");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_invalid_format() {
    let (_guard, path) = write_config("app_id = ", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(WxError::Config(ref msg)) if msg.contains("Invalid TOML")));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_unsupported_extension() {
    let (_guard, path) = write_config("app_id: wx", "yaml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(WxError::Config(ref msg)) if msg.contains("Unsupported")));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_nonexistent_file() {
    let result = config::load_from_file(Some(PathBuf::from("/nonexistent/wxkit.toml")));
    assert!(matches!(result, Err(WxError::Config(ref msg)) if msg.contains("not found")));
}
