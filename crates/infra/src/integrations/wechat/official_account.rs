//! Official account (公众号) endpoints.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use wxkit_common::PayloadDecoder;
use wxkit_domain::constants::{
    DEFAULT_QR_EXPIRE_SECONDS, HYDRATION_BATCH_SIZE, MATERIAL_MAX_COUNT, QR_ACTION_NAME,
};
use wxkit_domain::{
    AggregationResult, DecodedPayload, DirectoryPage, DirectorySnapshot, Industry,
    IndustryResponse, MaterialList, MaterialQuery, Menu, MessageReceipt, QrTicketResponse, Result,
    TemplateMessage, UserRecord, WxConfig, WxError,
};

use super::{ApiContext, DirectorySync};
use crate::http::Transport;

const INDUSTRY_PATH: &str = "/cgi-bin/template/get_industry";
const MENU_CREATE_PATH: &str = "/cgi-bin/menu/create";
const TEMPLATE_SEND_PATH: &str = "/cgi-bin/message/template/send";
const USER_INFO_PATH: &str = "/cgi-bin/user/info";
const QR_CREATE_PATH: &str = "/cgi-bin/qrcode/create";
const QR_SHOW_PATH: &str = "/cgi-bin/showqrcode";
const MATERIAL_LIST_PATH: &str = "/cgi-bin/material/batchget_material";

/// Client for one official account.
pub struct OfficialAccountClient {
    ctx: ApiContext,
    directory: DirectorySync,
    decoder: PayloadDecoder,
    industry: RwLock<Option<Industry>>,
}

impl OfficialAccountClient {
    /// Build the full stack (reqwest transport, credential cache) from `config`.
    pub fn new(config: WxConfig) -> Result<Self> {
        Ok(Self::from_context(ApiContext::from_config(config)?))
    }

    pub fn with_transport(config: WxConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_context(ApiContext::with_transport(config, transport)?))
    }

    pub fn from_context(ctx: ApiContext) -> Self {
        let decoder = PayloadDecoder::new(ctx.config().app_id.clone());
        let directory = DirectorySync::new(ctx.clone());
        Self { ctx, directory, decoder, industry: RwLock::new(None) }
    }

    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    pub fn directory(&self) -> &DirectorySync {
        &self.directory
    }

    /// Primary industry classes of the account; fetched once, then cached.
    pub async fn industry(&self) -> Result<Industry> {
        let cached = self.industry.read().clone();
        if let Some(industry) = cached {
            return Ok(industry);
        }

        let response: IndustryResponse = self.ctx.get(INDUSTRY_PATH, &[]).await?;
        let industry = Industry {
            primary_industry_first: response.primary_industry.first_class,
            primary_industry_second: response.primary_industry.second_class,
        };
        *self.industry.write() = Some(industry.clone());
        Ok(industry)
    }

    /// Industry from a previous [`industry`](Self::industry) call, if any.
    pub fn cached_industry(&self) -> Option<Industry> {
        self.industry.read().clone()
    }

    pub async fn create_menu(&self, menu: &Menu) -> Result<()> {
        let _: Value = self.ctx.post(MENU_CREATE_PATH, menu).await?;
        debug!(buttons = menu.button.len(), "menu created");
        Ok(())
    }

    pub async fn send_template_message(&self, message: &TemplateMessage) -> Result<MessageReceipt> {
        self.ctx.post(TEMPLATE_SEND_PATH, message).await
    }

    /// Profile of one follower, in the configured language.
    pub async fn user_info(&self, openid: &str) -> Result<UserRecord> {
        let lang = self.ctx.config().lang.as_str();
        self.ctx.get(USER_INFO_PATH, &[("openid", openid), ("lang", lang)]).await
    }

    /// Profiles of up to 100 followers; ids past the 100th are ignored.
    pub async fn user_infos(&self, openids: &[String]) -> Result<Vec<UserRecord>> {
        let batch = &openids[..openids.len().min(HYDRATION_BATCH_SIZE)];
        self.directory.hydrate_batch(batch).await
    }

    pub async fn user_list_page(&self, cursor: Option<&str>) -> Result<DirectoryPage> {
        self.directory.list_page(cursor).await
    }

    pub async fn user_list_all(&self) -> Result<DirectorySnapshot> {
        self.directory.enumerate_all().await
    }

    /// Every follower profile; see [`DirectorySync::sync_all`].
    pub async fn sync_users(&self) -> Result<AggregationResult> {
        self.directory.sync_all().await
    }

    /// Temporary string-scene QR code; returns the image URL.
    ///
    /// `expire_seconds` defaults to 360.
    #[instrument(skip(self))]
    pub async fn qr_ticket(&self, scene: &str, expire_seconds: Option<u32>) -> Result<String> {
        let body = json!({
            "expire_seconds": expire_seconds.unwrap_or(DEFAULT_QR_EXPIRE_SECONDS),
            "action_name": QR_ACTION_NAME,
            "action_info": { "scene": { "scene_str": scene } },
        });
        let response: QrTicketResponse = self.ctx.post(QR_CREATE_PATH, &body).await?;

        let ticket: String =
            url::form_urlencoded::byte_serialize(response.ticket.as_bytes()).collect();
        Ok(format!("{}{}?ticket={}", self.ctx.config().qr_base(), QR_SHOW_PATH, ticket))
    }

    /// Page through permanent materials. `count` must be within 1..=20.
    pub async fn materials(&self, query: MaterialQuery) -> Result<MaterialList> {
        if query.count == 0 || query.count > MATERIAL_MAX_COUNT {
            return Err(WxError::InvalidInput(format!(
                "material count must be between 1 and {MATERIAL_MAX_COUNT}, got {}",
                query.count
            )));
        }
        self.ctx.post(MATERIAL_LIST_PATH, &query).await
    }

    /// Decrypt user data signed for this account.
    pub fn decrypt_data(
        &self,
        session_key: &str,
        encrypted_data: &str,
        iv: &str,
    ) -> Result<DecodedPayload> {
        self.decoder.decode(session_key, iv, encrypted_data)
    }
}
