//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use thiserror::Error;
use wxkit_domain::WxError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub WxError);

impl From<InfraError> for WxError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WxError> for InfraError {
    fn from(value: WxError) -> Self {
        InfraError(value)
    }
}

trait IntoWxError {
    fn into_wx(self) -> WxError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WxError */
/* -------------------------------------------------------------------------- */

impl IntoWxError for HttpError {
    fn into_wx(self) -> WxError {
        if self.is_timeout() {
            return WxError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return WxError::Transport("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return WxError::Transport(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        if self.is_decode() {
            return WxError::Serialization(format!("failed to decode HTTP body: {self}"));
        }

        if self.is_builder() {
            return WxError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        WxError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_wx())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → WxError */
/* -------------------------------------------------------------------------- */

impl IntoWxError for JsonError {
    fn into_wx(self) -> WxError {
        WxError::Serialization(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_wx())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
