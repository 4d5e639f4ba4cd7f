//! Traits at the credential seams
//!
//! These traits let the credential manager stay free of HTTP concerns and let
//! endpoint clients be tested with a canned token.

use async_trait::async_trait;
use wxkit_domain::{AccessTokenResponse, Result};

/// Performs the client-credential grant for one tenant.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Tenant identifier, used for logging only.
    fn tenant_id(&self) -> &str;

    /// Request a fresh access token from the platform.
    ///
    /// # Errors
    /// Returns the transport or envelope failure unchanged; the manager wraps
    /// it as a credential fetch error.
    async fn fetch_credential(&self) -> Result<AccessTokenResponse>;
}

/// Yields a valid bearer token for authorized calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Retrieve a token that is valid at the time of the call.
    async fn access_token(&self) -> Result<String>;

    /// Drop any cached token so the next call fetches a new one.
    async fn invalidate(&self) {}
}
