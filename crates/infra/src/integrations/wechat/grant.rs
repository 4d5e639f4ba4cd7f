//! Client-credential grant (`/cgi-bin/token`).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use wxkit_common::CredentialSource;
use wxkit_domain::{AccessTokenResponse, Result, WxConfig};

use crate::http::{ApiRequest, Transport};

pub(crate) const TOKEN_PATH: &str = "/cgi-bin/token";

/// Exchanges the tenant's app id and secret for an access token.
pub struct ClientCredentialGrant {
    transport: Arc<dyn Transport>,
    token_url: String,
    app_id: String,
    app_secret: String,
}

impl ClientCredentialGrant {
    pub fn new(config: &WxConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token_url: format!("{}{}", config.api_base(), TOKEN_PATH),
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
        }
    }
}

impl fmt::Debug for ClientCredentialGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialGrant")
            .field("token_url", &self.token_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CredentialSource for ClientCredentialGrant {
    fn tenant_id(&self) -> &str {
        &self.app_id
    }

    async fn fetch_credential(&self) -> Result<AccessTokenResponse> {
        debug!(tenant = %self.app_id, "requesting access token");
        let request = ApiRequest::get(&self.token_url)
            .query("grant_type", "client_credential")
            .query("appid", &self.app_id)
            .query("secret", &self.app_secret);
        self.transport.execute(request).await?.into_json()
    }
}
