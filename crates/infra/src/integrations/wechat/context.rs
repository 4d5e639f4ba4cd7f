//! Shared plumbing of the authorized endpoint clients.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wxkit_common::{AccessTokenProvider, CredentialManager};
use wxkit_domain::{Result, WxConfig};

use super::grant::ClientCredentialGrant;
use crate::http::{ApiBody, ApiRequest, HttpClient, Transport};

/// Tenant configuration, transport and credential cache of one application.
///
/// Cheap to clone; every clone shares the same credential cache.
#[derive(Clone)]
pub struct ApiContext {
    config: Arc<WxConfig>,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn AccessTokenProvider>,
}

impl ApiContext {
    pub fn new(
        config: Arc<WxConfig>,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self { config, transport, credentials }
    }

    /// Validate `config` and wire a reqwest transport plus a credential cache.
    pub fn from_config(config: WxConfig) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpClient::from_config(&config)?);
        Self::with_transport(config, transport)
    }

    /// Same as [`from_config`](Self::from_config) over a caller-supplied transport.
    pub fn with_transport(config: WxConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let grant = ClientCredentialGrant::new(&config, Arc::clone(&transport));
        let credentials: Arc<dyn AccessTokenProvider> = Arc::new(CredentialManager::new(grant));
        Ok(Self::new(Arc::new(config), transport, credentials))
    }

    pub fn config(&self) -> &WxConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn credentials(&self) -> &Arc<dyn AccessTokenProvider> {
        &self.credentials
    }

    /// Absolute URL of an API path such as `/cgi-bin/user/get`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base(), path)
    }

    /// Attach a valid `access_token` and execute.
    pub async fn call(&self, request: ApiRequest) -> Result<ApiBody> {
        let token = self.credentials.access_token().await?;
        self.transport.execute(request.query("access_token", token)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let request = query
            .iter()
            .fold(ApiRequest::get(self.url(path)), |request, (key, value)| request.query(*key, *value));
        self.call(request).await?.into_json()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.call(ApiRequest::post(self.url(path), body)?).await?.into_json()
    }
}
