//! Shared fixtures for the wiremock-backed integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wxkit_domain::WxConfig;
use wxkit_infra::observability::init_test_tracing;

pub const APP_ID: &str = "wx-integration";
pub const APP_SECRET: &str = "integration-secret";
pub const TOKEN: &str = "IT_ACCESS_TOKEN";

/// Mock platform with test logging installed.
pub async fn start_server() -> MockServer {
    init_test_tracing();
    MockServer::start().await
}

/// Tenant config pointing every host at `server`.
pub fn config(server: &MockServer) -> WxConfig {
    WxConfig::new(APP_ID, APP_SECRET)
        .with_api_base_url(server.uri())
        .with_qr_base_url(server.uri())
}

/// Mount the client-credential grant, expecting exactly `calls` requests.
pub async fn mount_token(server: &MockServer, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .and(query_param("grant_type", "client_credential"))
        .and(query_param("appid", APP_ID))
        .and(query_param("secret", APP_SECRET))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": TOKEN, "expires_in": 7200})),
        )
        .expect(calls)
        .mount(server)
        .await;
}

/// Query parameter of a received request.
pub fn query(request: &wiremock::Request, key: &str) -> Option<String> {
    request.url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

/// Profiles echoing the ids of a batchget request body.
pub fn echo_profiles(request: &wiremock::Request) -> Value {
    let body: Value = request.body_json().expect("batchget body should be JSON");
    let profiles: Vec<Value> = body["user_list"]
        .as_array()
        .expect("user_list should be an array")
        .iter()
        .map(|entry| json!({"openid": entry["openid"], "subscribe": 1, "language": entry["lang"]}))
        .collect();
    json!({ "user_info_list": profiles })
}
