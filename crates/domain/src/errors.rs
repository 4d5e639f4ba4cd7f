//! Error types used throughout wxkit

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for wxkit
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum WxError {
    /// Connection failure or non-success HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The platform answered with a nonzero `errcode`. Displays only `errmsg`.
    #[error("{message}")]
    Api { code: i64, message: String },

    #[error("Credential fetch failed: {0}")]
    CredentialFetch(String),

    /// Collapsed decrypt/parse/watermark failure. Carries no cause on purpose.
    #[error("Illegal Buffer")]
    PayloadIntegrity,

    /// One hydration batch failed, so the whole aggregation was discarded.
    #[error("Aggregation failed at batch {batch}/{batches}: {message}")]
    Aggregation { batch: usize, batches: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WxError {
    /// Build an envelope failure from an `errcode`/`errmsg` pair.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api { code, message: message.into() }
    }

    /// Platform `errcode`, when the failure came from the envelope.
    #[must_use]
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for wxkit operations
pub type Result<T> = std::result::Result<T, WxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_platform_message_only() {
        let err = WxError::api(40001, "invalid credential");
        assert_eq!(err.to_string(), "invalid credential");
        assert_eq!(err.api_code(), Some(40001));
    }

    #[test]
    fn payload_integrity_is_opaque() {
        assert_eq!(WxError::PayloadIntegrity.to_string(), "Illegal Buffer");
        assert_eq!(WxError::PayloadIntegrity.api_code(), None);
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = WxError::Transport("connection refused".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Transport");
        assert_eq!(json["detail"], "connection refused");
    }
}
