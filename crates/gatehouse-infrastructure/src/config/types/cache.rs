//! Cache and invalidation configuration types

use gatehouse_domain::constants::{
    CACHE_TTL_SECS, INVALIDATION_CHANNEL, RESOURCE_FEED_KEY, RETRY_BACKOFF_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-through cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
    /// Serve through the origin when the store is unreachable
    pub fail_open: bool,
    /// Coalesce concurrent misses for the same key
    pub single_flight: bool,
    /// Cache key of the resource feed
    pub feed_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: CACHE_TTL_SECS,
            fail_open: false,
            single_flight: false,
            feed_key: RESOURCE_FEED_KEY.to_string(),
        }
    }
}

impl CacheConfig {
    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Invalidation listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvalidationConfig {
    /// Run the listener
    pub enabled: bool,
    /// Channel carrying notices
    pub channel: String,
    /// Keys evicted by notices that name none, `[cache.feed_key]` when empty
    pub default_keys: Vec<String>,
    /// Delay before resubscribing in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for InvalidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel: INVALIDATION_CHANNEL.to_string(),
            default_keys: Vec::new(),
            retry_backoff_ms: RETRY_BACKOFF_MS,
        }
    }
}

impl InvalidationConfig {
    /// Resubscribe delay
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Keys evicted by empty notices, falling back to the cached feed
    pub fn effective_default_keys(&self, cache: &CacheConfig) -> Vec<String> {
        if self.default_keys.is_empty() {
            vec![cache.feed_key.clone()]
        } else {
            self.default_keys.clone()
        }
    }
}
