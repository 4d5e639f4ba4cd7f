//! Access credential issued by the client-credential grant

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short-lived bearer token plus the data needed to judge its freshness.
///
/// Times are wall-clock milliseconds since the UNIX epoch. A credential is
/// usable while `now <= issued_at_ms + ttl_seconds * 1000`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub issued_at_ms: u64,
    pub ttl_seconds: u64,
}

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>, issued_at_ms: u64, ttl_seconds: u64) -> Self {
        Self { token: token.into(), issued_at_ms, ttl_seconds }
    }

    /// Last millisecond at which the token is still considered valid.
    #[must_use]
    pub fn expires_at_ms(&self) -> u64 {
        self.issued_at_ms.saturating_add(self.ttl_seconds.saturating_mul(1000))
    }

    /// `true` when the token is empty or `now_ms` is past the expiry.
    #[must_use]
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.token.is_empty() || now_ms > self.expires_at_ms()
    }

    /// Expiry as a UTC timestamp, for diagnostics.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.expires_at_ms()).ok().and_then(DateTime::from_timestamp_millis)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("issued_at_ms", &self.issued_at_ms)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// `/cgi-bin/token` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}
