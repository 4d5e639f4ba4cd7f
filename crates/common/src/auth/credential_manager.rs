//! Credential manager with expiry-driven refresh
//!
//! Manages the access credential of one tenant:
//! - Lazily fetches the credential on first use
//! - Refreshes once `now > issued_at + ttl` (wall-clock millis)
//! - Serializes refreshes so concurrent callers share one grant request
//! - Leaves the cached credential untouched when a refresh fails

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use wxkit_domain::{Credential, Result, WxError};

use super::traits::{AccessTokenProvider, CredentialSource};
use crate::time::{Clock, SystemClock};

/// Per-tenant credential cache
///
/// The check-then-refresh sequence runs under `refresh_lock`. A caller that
/// finds the credential stale takes the lock, re-checks, and only then asks
/// the source for a new grant. Callers queued behind it see the fresh value and
/// return without another request.
pub struct CredentialManager<S: CredentialSource + 'static, C: Clock = SystemClock> {
    source: Arc<S>,
    clock: C,
    current: RwLock<Option<Credential>>,
    refresh_lock: Mutex<()>,
    refresh_count: AtomicU64,
}

impl<S: CredentialSource + 'static> CredentialManager<S> {
    /// Create a manager backed by the system clock
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock)
    }
}

impl<S: CredentialSource + 'static, C: Clock> CredentialManager<S, C> {
    /// Create a manager with an explicit clock (tests use `MockClock`)
    #[must_use]
    pub fn with_clock(source: S, clock: C) -> Self {
        Self {
            source: Arc::new(source),
            clock,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            refresh_count: AtomicU64::new(0),
        }
    }

    /// Get a valid access token, refreshing it first if needed
    ///
    /// # Errors
    /// Returns [`WxError::CredentialFetch`] if the grant request fails or
    /// yields an empty token. No retry is attempted.
    pub async fn get_valid_credential(&self) -> Result<String> {
        if let Some(token) = self.fresh_token().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = self.fresh_token().await {
            debug!(tenant = self.source.tenant_id(), "credential refreshed by concurrent caller");
            return Ok(token);
        }

        self.refresh().await
    }

    /// Snapshot of the cached credential, fresh or not
    pub async fn cached(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    /// Drop the cached credential; the next call refreshes
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
        debug!(tenant = self.source.tenant_id(), "credential invalidated");
    }

    /// Number of grant requests issued so far
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count.load(Ordering::SeqCst)
    }

    async fn fresh_token(&self) -> Option<String> {
        let now = self.clock.millis_since_epoch();
        let current = self.current.read().await;
        current.as_ref().filter(|credential| !credential.is_expired_at(now)).map(|c| c.token.clone())
    }

    async fn refresh(&self) -> Result<String> {
        let tenant = self.source.tenant_id();
        let started_at = self.clock.millis_since_epoch();
        self.refresh_count.fetch_add(1, Ordering::SeqCst);

        let grant = self.source.fetch_credential().await.map_err(|err| {
            warn!(tenant, error = %err, "credential refresh failed");
            match err {
                WxError::CredentialFetch(_) => err,
                other => WxError::CredentialFetch(other.to_string()),
            }
        })?;

        if grant.access_token.is_empty() {
            warn!(tenant, "credential refresh returned an empty token");
            return Err(WxError::CredentialFetch("grant response carried no access_token".into()));
        }

        let credential = Credential::new(grant.access_token, started_at, grant.expires_in);
        let token = credential.token.clone();
        *self.current.write().await = Some(credential);

        info!(tenant, ttl_seconds = grant.expires_in, "access credential refreshed");
        Ok(token)
    }
}

#[async_trait]
impl<S: CredentialSource + 'static, C: Clock> AccessTokenProvider for CredentialManager<S, C> {
    async fn access_token(&self) -> Result<String> {
        self.get_valid_credential().await
    }

    async fn invalidate(&self) {
        CredentialManager::invalidate(self).await;
    }
}
