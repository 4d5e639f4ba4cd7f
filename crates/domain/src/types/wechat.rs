//! Request and response bodies of the individual platform endpoints
//!
//! These are thin serde mirrors of the wire format. Fields the library does not
//! look at are kept as raw JSON so nothing is lost in transit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Directory hydration
// =============================================================================

/// One entry of a `user/info/batchget` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HydrationTarget {
    pub openid: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HydrationRequest {
    pub user_list: Vec<HydrationTarget>,
}

impl HydrationRequest {
    pub fn new<'a>(openids: impl IntoIterator<Item = &'a String>, lang: &str) -> Self {
        let user_list = openids
            .into_iter()
            .map(|openid| HydrationTarget { openid: openid.clone(), lang: lang.to_string() })
            .collect();
        Self { user_list }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HydrationResponse {
    #[serde(default)]
    pub user_info_list: Vec<super::UserRecord>,
}

// =============================================================================
// Official account
// =============================================================================

/// Industry classification pair of an official account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Industry {
    pub primary_industry_first: String,
    pub primary_industry_second: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryClass {
    pub first_class: String,
    pub second_class: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryResponse {
    pub primary_industry: IndustryClass,
    #[serde(default)]
    pub secondary_industry: Option<IndustryClass>,
}

/// Custom menu definition for `menu/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub button: Vec<MenuButton>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagepath: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_button: Vec<MenuButton>,
}

/// Template message pushed to an official-account follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMessage {
    pub touser: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miniprogram: Option<Value>,
    pub data: Value,
}

/// Send result carrying the platform's message id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageReceipt {
    #[serde(default)]
    pub msgid: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QrTicketResponse {
    pub ticket: String,
    #[serde(default)]
    pub expire_seconds: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Kind of permanent material to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Image,
    Video,
    Voice,
    #[default]
    News,
}

/// `material/batchget_material` query. Defaults to the first 20 news items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialQuery {
    #[serde(rename = "type")]
    pub kind: MaterialType,
    pub offset: u32,
    pub count: u32,
}

impl Default for MaterialQuery {
    fn default() -> Self {
        Self { kind: MaterialType::News, offset: 0, count: 20 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub item_count: u64,
    #[serde(default)]
    pub item: Vec<Value>,
}

// =============================================================================
// Mini program
// =============================================================================

/// `jscode2session` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub openid: String,
    pub session_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unionid: Option<String>,
}

/// Subscribe message sent to a mini-program user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeMessage {
    pub touser: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miniprogram_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Mini-program page a URL scheme jumps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpWxa {
    pub path: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlSchemeRequest {
    pub access_token: String,
    pub is_expire: bool,
    pub expire_time: i64,
    pub jump_wxa: JumpWxa,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrlSchemeResponse {
    pub openlink: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QrCodeRequest<'a> {
    pub scene: &'a str,
    pub page: &'a str,
}

// =============================================================================
// Open platform web login
// =============================================================================

/// `sns/oauth2/access_token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct WebAccessToken {
    pub access_token: String,
    pub openid: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub unionid: Option<String>,
}

/// `sns/userinfo` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebUserInfo {
    pub openid: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub sex: i32,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub headimgurl: String,
    #[serde(default)]
    pub privilege: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unionid: Option<String>,
}
