//! Configuration loader
//!
//! Loads tenant configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes the working directory and its parents for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `WXKIT_APP_ID`: Application id (required)
//! - `WXKIT_APP_SECRET`: Application secret (required)
//! - `WXKIT_API_BASE_URL`: API host override
//! - `WXKIT_QR_BASE_URL`: QR image host override
//! - `WXKIT_LANG`: Profile language for hydration
//! - `WXKIT_TIMEOUT_SECS`: Per-request timeout
//! - `WXKIT_MAX_ATTEMPTS`: Total attempts per request
//! - `WXKIT_HYDRATION_CONCURRENCY`: Hydration batches in flight
//!
//! ## File Locations
//! `wxkit.toml` then `wxkit.json`, in the current working directory and then in
//! each parent up to two levels.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use wxkit_domain::{Result, WxConfig, WxError};

const FILE_NAMES: [&str; 2] = ["wxkit.toml", "wxkit.json"];
const PARENT_LEVELS: usize = 2;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `WxError::Config` if neither source yields a valid configuration.
pub fn load() -> Result<WxConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `WXKIT_APP_ID` and `WXKIT_APP_SECRET` are required; every other variable
/// falls back to its default.
///
/// # Errors
/// Returns `WxError::Config` if required variables are missing, a numeric
/// variable does not parse, or validation fails.
pub fn load_from_env() -> Result<WxConfig> {
    let mut config = WxConfig::new(env_var("WXKIT_APP_ID")?, env_var("WXKIT_APP_SECRET")?);

    if let Some(url) = env_opt("WXKIT_API_BASE_URL") {
        config.api_base_url = url;
    }
    if let Some(url) = env_opt("WXKIT_QR_BASE_URL") {
        config.qr_base_url = url;
    }
    if let Some(lang) = env_opt("WXKIT_LANG") {
        config.lang = lang;
    }
    if let Some(timeout) = env_parse("WXKIT_TIMEOUT_SECS")? {
        config.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse("WXKIT_MAX_ATTEMPTS")? {
        config.max_attempts = attempts;
    }
    if let Some(limit) = env_parse("WXKIT_HYDRATION_CONCURRENCY")? {
        config.hydration_concurrency = limit;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. Format is detected by file extension.
///
/// # Errors
/// Returns `WxError::Config` if the file is missing, malformed or invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<WxConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WxError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WxError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WxError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<WxConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WxError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WxError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(WxError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe for a configuration file starting at the working directory
///
/// Returns the first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(PARENT_LEVELS + 1)
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| WxError::Config(format!("Missing required environment variable: {}", key)))
}

/// Set and non-blank, trimmed.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| WxError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
