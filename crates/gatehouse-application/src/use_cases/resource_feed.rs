//! Resource Feed Use Case
//!
//! Serves the feed through the read-through cache, loading it from the
//! configured origin on a miss.

use crate::use_cases::read_through::ReadThroughCache;
use gatehouse_domain::constants::{CACHE_TTL_SECS, RESOURCE_FEED_KEY};
use gatehouse_domain::error::Result;
use gatehouse_domain::ports::OriginProvider;
use gatehouse_domain::value_objects::CacheLookup;
use std::sync::Arc;
use std::time::Duration;

/// Feed lookups through the cache
#[derive(Debug, Clone)]
pub struct ResourceFeedService {
    cache: ReadThroughCache,
    origin: Arc<dyn OriginProvider>,
    key: String,
    ttl: Duration,
}

impl ResourceFeedService {
    /// Create a feed service with the default key and TTL
    pub fn new(cache: ReadThroughCache, origin: Arc<dyn OriginProvider>) -> Self {
        Self {
            cache,
            origin,
            key: RESOURCE_FEED_KEY.to_string(),
            ttl: Duration::from_secs(CACHE_TTL_SECS),
        }
    }

    /// Cache key (also the resource name passed to the origin)
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Entry lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cache key of the feed
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fetch the feed, loading from the origin on a miss
    pub async fn feed(&self) -> Result<CacheLookup<serde_json::Value>> {
        let origin = Arc::clone(&self.origin);
        let resource = self.key.clone();
        self.cache
            .get_or_load(&self.key, self.ttl, move || async move {
                origin.load(&resource).await
            })
            .await
    }
}
