//! HTTP origin
//!
//! Loads resources as JSON documents from `<base_url>/<resource>`.

use crate::constants::HTTP_ORIGIN_TIMEOUT_SECS;
use async_trait::async_trait;
use gatehouse_domain::error::{Error, Result};
use gatehouse_domain::ports::OriginProvider;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Origin fetching JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpOrigin {
    /// Create an origin for `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::origin_with_source("Failed to create HTTP client", e))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    /// URL requested for a resource
    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
    }
}

#[async_trait]
impl OriginProvider for HttpOrigin {
    async fn load(&self, resource: &str) -> Result<Value> {
        let url = self.resource_url(resource);
        debug!(url = %url, "Loading resource over HTTP");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::origin(format!(
                    "Request to {url} timed out after {:?}",
                    self.timeout
                ))
            } else {
                Error::origin_with_source(format!("Request to {url} failed"), e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::origin(format!(
                "{url} returned {}: {body}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::origin_with_source(format!("Invalid JSON from {url}"), e))
    }

    fn provider_name(&self) -> &str {
        "http"
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use gatehouse_application::ports::registry::{
    ORIGIN_PROVIDERS, OriginProviderConfig, OriginProviderEntry,
};

fn http_origin_factory(
    config: &OriginProviderConfig,
) -> std::result::Result<Arc<dyn OriginProvider>, String> {
    let url = config
        .url
        .clone()
        .ok_or_else(|| "HTTP origin requires a url".to_string())?;
    let timeout = config
        .timeout
        .unwrap_or(Duration::from_secs(HTTP_ORIGIN_TIMEOUT_SECS));
    let origin =
        HttpOrigin::new(url, timeout).map_err(|e| format!("Failed to create HTTP origin: {e}"))?;
    Ok(Arc::new(origin))
}

#[linkme::distributed_slice(ORIGIN_PROVIDERS)]
static HTTP_ORIGIN: OriginProviderEntry = OriginProviderEntry {
    name: "http",
    description: "JSON documents fetched from an upstream HTTP service",
    factory: http_origin_factory,
};
