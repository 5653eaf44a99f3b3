//! Origin Provider Port
//!
//! The slow, possibly failing source a read-through cache sits in front of.

use crate::error::Result;
use async_trait::async_trait;

/// Upstream data source
///
/// Failures must surface as [`Error::Origin`](crate::error::Error::Origin) so
/// the cache never stores them.
#[async_trait]
pub trait OriginProvider: Send + Sync + std::fmt::Debug {
    /// Load the current representation of `resource`
    async fn load(&self, resource: &str) -> Result<serde_json::Value>;

    /// Get the name/identifier of this provider implementation
    fn provider_name(&self) -> &str;
}
