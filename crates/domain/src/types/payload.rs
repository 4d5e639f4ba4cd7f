//! Encrypted payload exchange types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base64 key/iv/ciphertext triplet supplied by the caller for one decode.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub key_b64: String,
    pub iv_b64: String,
    pub cipher_b64: String,
}

impl EncryptedPayload {
    pub fn new(
        key_b64: impl Into<String>,
        iv_b64: impl Into<String>,
        cipher_b64: impl Into<String>,
    ) -> Self {
        Self { key_b64: key_b64.into(), iv_b64: iv_b64.into(), cipher_b64: cipher_b64.into() }
    }
}

impl std::fmt::Debug for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedPayload")
            .field("key_b64", &"[REDACTED]")
            .field("iv_b64", &self.iv_b64)
            .field("cipher_len", &self.cipher_b64.len())
            .finish()
    }
}

/// Tenant stamp embedded in every decrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub appid: String,
    /// Unix seconds at which the platform issued the payload.
    pub timestamp: i64,
}

/// A payload that decrypted, parsed and carried the expected watermark.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    watermark: Watermark,
    document: Value,
}

impl DecodedPayload {
    /// Only the decoder builds these, after the watermark check passed.
    #[must_use]
    pub fn new(watermark: Watermark, document: Value) -> Self {
        Self { watermark, document }
    }

    #[must_use]
    pub fn watermark(&self) -> &Watermark {
        &self.watermark
    }

    /// Full parsed document, watermark included.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> Value {
        self.document
    }

    /// Deserialize the document into a caller-defined shape.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.document)
    }
}
