//! Open platform web login (网站应用).

use std::sync::Arc;

use tracing::debug;
use wxkit_domain::{Result, WebAccessToken, WebUserInfo, WxConfig};

use crate::http::{ApiRequest, HttpClient, Transport};

const OAUTH_TOKEN_PATH: &str = "/sns/oauth2/access_token";
const USER_INFO_PATH: &str = "/sns/userinfo";

/// Client for a website application's QR login.
///
/// Uses per-user OAuth tokens only, so it carries no credential cache.
pub struct OpenWebClient {
    config: Arc<WxConfig>,
    transport: Arc<dyn Transport>,
}

impl OpenWebClient {
    pub fn new(config: WxConfig) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpClient::from_config(&config)?);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: WxConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config: Arc::new(config), transport })
    }

    /// Exchange the login `code` for a user access token.
    pub async fn access_token(&self, code: &str) -> Result<WebAccessToken> {
        let request = ApiRequest::get(self.url(OAUTH_TOKEN_PATH))
            .query("appid", &self.config.app_id)
            .query("secret", &self.config.app_secret)
            .query("code", code)
            .query("grant_type", "authorization_code");
        self.transport.execute(request).await?.into_json()
    }

    /// Profile of the user who scanned the login QR code.
    pub async fn user_info(&self, code: &str) -> Result<WebUserInfo> {
        let token = self.access_token(code).await?;
        debug!(openid = %token.openid, "web login code exchanged");

        let request = ApiRequest::get(self.url(USER_INFO_PATH))
            .query("access_token", token.access_token)
            .query("openid", token.openid);
        self.transport.execute(request).await?.into_json()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base(), path)
    }
}
