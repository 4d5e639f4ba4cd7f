//! Configuration structures

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HYDRATION_CONCURRENCY, DEFAULT_LANG, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_QR_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use crate::{Result, WxError};

/// Tenant identity and client tuning for one WeChat application.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WxConfig {
    pub app_id: String,
    pub app_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_qr_base_url")]
    pub qr_base_url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per request (1 disables transport retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Upper bound on hydration batches in flight.
    #[serde(default = "default_hydration_concurrency")]
    pub hydration_concurrency: usize,
}

impl WxConfig {
    /// Config with every tunable at its default.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            api_base_url: default_api_base_url(),
            qr_base_url: default_qr_base_url(),
            lang: default_lang(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            hydration_concurrency: default_hydration_concurrency(),
        }
    }

    /// Point all JSON endpoints at another host (used against mock servers).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_qr_base_url(mut self, url: impl Into<String>) -> Self {
        self.qr_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_hydration_concurrency(mut self, limit: usize) -> Self {
        self.hydration_concurrency = limit;
        self
    }

    /// Reject configurations that cannot authenticate or dispatch.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(WxError::Config("app_id must not be empty".into()));
        }
        if self.app_secret.trim().is_empty() {
            return Err(WxError::Config("app_secret must not be empty".into()));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(WxError::Config("api_base_url must not be empty".into()));
        }
        if self.hydration_concurrency == 0 {
            return Err(WxError::Config("hydration_concurrency must be greater than 0".into()));
        }
        if self.max_attempts == 0 {
            return Err(WxError::Config("max_attempts must be greater than 0".into()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    #[must_use]
    pub fn qr_base(&self) -> &str {
        self.qr_base_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for WxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WxConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("qr_base_url", &self.qr_base_url)
            .field("lang", &self.lang)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("hydration_concurrency", &self.hydration_concurrency)
            .finish()
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_qr_base_url() -> String {
    DEFAULT_QR_BASE_URL.to_string()
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_hydration_concurrency() -> usize {
    DEFAULT_HYDRATION_CONCURRENCY
}
