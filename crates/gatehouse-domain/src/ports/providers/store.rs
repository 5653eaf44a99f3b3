//! Combined store port

use super::{CounterStore, KeyValueStore, LogStore, PubSubStore};
use crate::error::Result;
use async_trait::async_trait;

/// Handle to the external store
///
/// One value of this trait is created by the composition root and injected
/// into every component. Components only depend on the narrow port they use.
#[async_trait]
pub trait StoreProvider:
    CounterStore + KeyValueStore + PubSubStore + LogStore + std::fmt::Debug
{
    /// Round-trip to the store
    async fn ping(&self) -> Result<()>;

    /// Get the name/identifier of this provider implementation
    fn provider_name(&self) -> &str;
}
