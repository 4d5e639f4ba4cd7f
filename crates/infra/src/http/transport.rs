//! Request/response model shared by every platform call, plus the
//! `errcode`/`errmsg` envelope convention.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use wxkit_domain::{Result, WxError};

use crate::errors::InfraError;

/// How the response body should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Parse as JSON and unwrap the envelope.
    #[default]
    Json,
    /// Keep raw bytes (images). A JSON-typed reply is still checked for `errcode`.
    Bytes,
}

/// One platform call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub mode: ResponseMode,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            query: Vec::new(),
            body: None,
            mode: ResponseMode::Json,
        }
    }

    /// POST with a JSON body.
    pub fn post<B: Serialize + ?Sized>(url: impl Into<String>, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body).map_err(|err| WxError::from(InfraError::from(err)))?;
        Ok(Self {
            method: Method::POST,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
            mode: ResponseMode::Json,
        })
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn bytes(mut self) -> Self {
        self.mode = ResponseMode::Bytes;
        self
    }

    /// Value of the first query parameter named `key`.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Bytes { content_type: Option<String>, data: Vec<u8> },
}

impl ApiBody {
    /// Deserialize a JSON body into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(value) => {
                serde_json::from_value(value).map_err(|err| WxError::from(InfraError::from(err)))
            }
            Self::Bytes { .. } => {
                Err(WxError::Serialization("expected a JSON body, got raw bytes".into()))
            }
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes { data, .. } => Ok(data),
            Self::Json(_) => Err(WxError::Serialization("expected raw bytes, got JSON".into())),
        }
    }
}

/// Performs one HTTP exchange.
///
/// Implementations fail with [`WxError::Transport`] on network errors and
/// non-success statuses, and with [`WxError::Api`] when the envelope carries a
/// nonzero `errcode`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiBody>;
}

/// Reject envelopes with a nonzero `errcode`; pass everything else through.
pub fn check_envelope(value: Value) -> Result<Value> {
    let code = value.get("errcode").and_then(Value::as_i64).unwrap_or(0);
    if code == 0 {
        return Ok(value);
    }

    let message =
        value.get("errmsg").and_then(Value::as_str).unwrap_or("unknown platform error").to_string();
    warn!(errcode = code, errmsg = %message, "platform rejected request");
    Err(WxError::api(code, message))
}

/// Turn a successful HTTP body into an [`ApiBody`] according to `mode`.
pub fn decode_body(mode: ResponseMode, content_type: Option<String>, data: Vec<u8>) -> Result<ApiBody> {
    match mode {
        ResponseMode::Json => {
            let value: Value =
                serde_json::from_slice(&data).map_err(|err| WxError::from(InfraError::from(err)))?;
            check_envelope(value).map(ApiBody::Json)
        }
        ResponseMode::Bytes => {
            if content_type.as_deref().is_some_and(is_json_content_type) {
                if let Ok(value) = serde_json::from_slice::<Value>(&data) {
                    check_envelope(value)?;
                }
            }
            Ok(ApiBody::Bytes { content_type, data })
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json") || essence.eq_ignore_ascii_case("text/json")
}
