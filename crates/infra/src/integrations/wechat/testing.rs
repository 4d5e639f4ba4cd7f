//! In-process doubles for the transport and the credential cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use wxkit_common::AccessTokenProvider;
use wxkit_domain::{Result, WxConfig, WxError};

use super::ApiContext;
use crate::http::{check_envelope, ApiBody, ApiRequest, Transport};

type Handler = Arc<dyn Fn(&ApiRequest) -> Result<ApiBody> + Send + Sync>;

/// Routes requests by URL path to canned handlers and records every call.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<String, Handler>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay_ms: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// JSON route; the returned document goes through the envelope check.
    pub(crate) fn on<F>(self: Arc<Self>, path: &str, handler: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest) -> Result<Value> + Send + Sync + 'static,
    {
        self.on_body(path, move |request| handler(request).and_then(check_envelope).map(ApiBody::Json))
    }

    pub(crate) fn on_body<F>(self: Arc<Self>, path: &str, handler: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest) -> Result<ApiBody> + Send + Sync + 'static,
    {
        self.routes.lock().insert(path.to_string(), Arc::new(handler));
        self
    }

    pub(crate) fn with_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests().into_iter().filter(|request| path_of(&request.url) == path).collect()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiBody> {
        self.requests.lock().push(request.clone());
        let handler = self.routes.lock().get(&path_of(&request.url)).cloned();

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match handler {
            Some(handler) => handler(&request),
            None => Err(WxError::Transport(format!("no route for {}", request.url))),
        }
    }
}

fn path_of(url: &str) -> String {
    url::Url::parse(url).map(|parsed| parsed.path().to_string()).unwrap_or_else(|_| url.to_string())
}

/// Hands out one fixed token.
pub(crate) struct StaticToken {
    token: String,
    calls: AtomicUsize,
}

impl StaticToken {
    pub(crate) fn new(token: &str) -> Arc<Self> {
        Arc::new(Self { token: token.to_string(), calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone())
    }
}

pub(crate) const TEST_APP_ID: &str = "wx-test-app";

pub(crate) fn test_config() -> WxConfig {
    WxConfig::new(TEST_APP_ID, "test-secret").with_api_base_url("http://mock")
}

/// Context over `transport` whose token is always `"TOKEN"`.
pub(crate) fn context(transport: Arc<MockTransport>) -> ApiContext {
    context_with(test_config(), transport)
}

pub(crate) fn context_with(config: WxConfig, transport: Arc<MockTransport>) -> ApiContext {
    ApiContext::new(Arc::new(config), transport, StaticToken::new("TOKEN"))
}
