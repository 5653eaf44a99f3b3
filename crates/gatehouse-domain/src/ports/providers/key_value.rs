//! Key-value port

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Plain string key-value storage with expiry
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value and its expiry in one atomic call
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;
}
