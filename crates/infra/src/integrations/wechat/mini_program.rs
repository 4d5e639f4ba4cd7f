//! Mini program (小程序) endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;
use wxkit_common::PayloadDecoder;
use wxkit_domain::constants::{
    DEFAULT_MINI_PROGRAM_PAGE, DEFAULT_URL_SCHEME_EXPIRE_TIME, PNG_DATA_URI_PREFIX,
};
use wxkit_domain::{
    DecodedPayload, JumpWxa, QrCodeRequest, Result, SessionInfo, SubscribeMessage,
    UrlSchemeRequest, UrlSchemeResponse, WxConfig, WxError,
};

use super::ApiContext;
use crate::http::{ApiRequest, Transport};

const CODE_TO_SESSION_PATH: &str = "/sns/jscode2session";
const UNLIMITED_QR_PATH: &str = "/wxa/getwxacodeunlimit";
const SUBSCRIBE_SEND_PATH: &str = "/cgi-bin/message/subscribe/send";
const URL_SCHEME_PATH: &str = "/wxa/generatescheme";

/// Client for one mini program.
///
/// Remembers the `session_key` of every user that logged in through
/// [`code_to_session`](Self::code_to_session), so their encrypted data can be
/// decrypted later by openid alone.
pub struct MiniProgramClient {
    ctx: ApiContext,
    decoder: PayloadDecoder,
    sessions: RwLock<HashMap<String, String>>,
    url_scheme_expire_time: i64,
}

impl MiniProgramClient {
    pub fn new(config: WxConfig) -> Result<Self> {
        Ok(Self::from_context(ApiContext::from_config(config)?))
    }

    pub fn with_transport(config: WxConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_context(ApiContext::with_transport(config, transport)?))
    }

    pub fn from_context(ctx: ApiContext) -> Self {
        let decoder = PayloadDecoder::new(ctx.config().app_id.clone());
        Self {
            ctx,
            decoder,
            sessions: RwLock::new(HashMap::new()),
            url_scheme_expire_time: DEFAULT_URL_SCHEME_EXPIRE_TIME,
        }
    }

    /// Expiry (unix seconds) sent with every URL scheme request.
    #[must_use]
    pub fn with_url_scheme_expire_time(mut self, expire_time: i64) -> Self {
        self.url_scheme_expire_time = expire_time;
        self
    }

    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    /// Exchange a login `code` for the user's identity and session key.
    pub async fn code_to_session(&self, code: &str) -> Result<SessionInfo> {
        let config = self.ctx.config();
        let request = ApiRequest::get(self.ctx.url(CODE_TO_SESSION_PATH))
            .query("appid", &config.app_id)
            .query("secret", &config.app_secret)
            .query("js_code", code)
            .query("grant_type", "authorization_code");
        let session: SessionInfo = self.ctx.transport().execute(request).await?.into_json()?;

        self.sessions.write().insert(session.openid.clone(), session.session_key.clone());
        debug!(openid = %session.openid, "session key recorded");
        Ok(session)
    }

    /// Session key recorded for `openid` by an earlier login exchange.
    pub fn session_key(&self, openid: &str) -> Option<String> {
        self.sessions.read().get(openid).cloned()
    }

    /// Unlimited mini program code as a `data:image/png;base64,` URI.
    ///
    /// `page` defaults to `pages/index/index`.
    pub async fn qr_code(&self, scene: &str, page: Option<&str>) -> Result<String> {
        let body = QrCodeRequest { scene, page: page.unwrap_or(DEFAULT_MINI_PROGRAM_PAGE) };
        let request = ApiRequest::post(self.ctx.url(UNLIMITED_QR_PATH), &body)?.bytes();
        let image = self.ctx.call(request).await?.into_bytes()?;

        Ok(format!("{PNG_DATA_URI_PREFIX}{}", BASE64.encode(image)))
    }

    pub async fn send_subscribe_message(&self, message: &SubscribeMessage) -> Result<()> {
        let _: Value = self.ctx.post(SUBSCRIBE_SEND_PATH, message).await?;
        Ok(())
    }

    /// Generate a URL scheme that opens `jump_wxa` from outside WeChat.
    pub async fn url_scheme(&self, jump_wxa: JumpWxa) -> Result<UrlSchemeResponse> {
        let access_token = self.ctx.credentials().access_token().await?;
        let body = UrlSchemeRequest {
            access_token: access_token.clone(),
            is_expire: true,
            expire_time: self.url_scheme_expire_time,
            jump_wxa,
        };
        let request = ApiRequest::post(self.ctx.url(URL_SCHEME_PATH), &body)?
            .query("access_token", access_token);
        self.ctx.transport().execute(request).await?.into_json()
    }

    /// Decrypt data of a user who logged in through this client.
    ///
    /// # Errors
    /// [`WxError::InvalidInput`] if no session key is recorded for `openid`,
    /// otherwise the opaque [`WxError::PayloadIntegrity`] on any decode failure.
    pub fn decrypt_data(
        &self,
        openid: &str,
        encrypted_data: &str,
        iv: &str,
    ) -> Result<DecodedPayload> {
        let session_key = self.session_key(openid).ok_or_else(|| {
            WxError::InvalidInput(format!("no session key recorded for {openid}"))
        })?;
        self.decoder.decode(&session_key, iv, encrypted_data)
    }
}
