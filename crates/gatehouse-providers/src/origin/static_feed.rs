//! Static feed origin
//!
//! Stands in for a slow database: every load waits for a fixed latency and
//! returns the same product list.

use crate::constants::STATIC_ORIGIN_LATENCY_MS;
use async_trait::async_trait;
use gatehouse_domain::error::Result;
use gatehouse_domain::ports::OriginProvider;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Origin returning a fixed product feed
#[derive(Debug, Clone)]
pub struct StaticFeedOrigin {
    latency: Duration,
    feed: Value,
}

impl StaticFeedOrigin {
    /// Create the origin with the default latency
    pub fn new() -> Self {
        Self::with_latency(Duration::from_millis(STATIC_ORIGIN_LATENCY_MS))
    }

    /// Create the origin with a custom latency
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            feed: json!([
                { "id": 1, "name": "iPhone 15", "price": 999 },
                { "id": 2, "name": "MacBook Pro", "price": 1999 }
            ]),
        }
    }

    /// Replace the served document
    pub fn with_feed(mut self, feed: Value) -> Self {
        self.feed = feed;
        self
    }

    /// Configured latency
    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for StaticFeedOrigin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OriginProvider for StaticFeedOrigin {
    async fn load(&self, resource: &str) -> Result<Value> {
        debug!(resource, latency_ms = self.latency.as_millis() as u64, "Loading static feed");
        tokio::time::sleep(self.latency).await;
        Ok(self.feed.clone())
    }

    fn provider_name(&self) -> &str {
        "static"
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use gatehouse_application::ports::registry::{
    ORIGIN_PROVIDERS, OriginProviderConfig, OriginProviderEntry,
};

fn static_origin_factory(
    config: &OriginProviderConfig,
) -> std::result::Result<Arc<dyn OriginProvider>, String> {
    let origin = match config.latency {
        Some(latency) => StaticFeedOrigin::with_latency(latency),
        None => StaticFeedOrigin::new(),
    };
    Ok(Arc::new(origin))
}

#[linkme::distributed_slice(ORIGIN_PROVIDERS)]
static STATIC_ORIGIN: OriginProviderEntry = OriginProviderEntry {
    name: "static",
    description: "Fixed product feed with simulated latency",
    factory: static_origin_factory,
};
