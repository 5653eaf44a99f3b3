//! Atomic counter port

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Remaining lifetime of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist
    Missing,
    /// The key exists without an expiry
    Persistent,
    /// The key expires after the given duration
    Expires(Duration),
}

/// Atomic counters with expiry
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `key` by one and return the post-increment value
    ///
    /// An absent key is created with value 1. Increments on the same key are
    /// linearized by the store.
    async fn increment(&self, key: &str) -> Result<u64>;

    /// Set a time-to-live on an existing key
    ///
    /// Returns `false` when the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Query the remaining lifetime of `key`
    async fn ttl(&self, key: &str) -> Result<KeyTtl>;
}
