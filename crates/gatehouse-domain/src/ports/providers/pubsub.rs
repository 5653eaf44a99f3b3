//! Publish/subscribe port

use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of raw payloads received on a channel
///
/// The stream ends when the subscription is lost; callers resubscribe.
pub type MessageStream = Pin<Box<dyn Stream<Item = String> + Send + 'static>>;

/// Ephemeral channel messaging
///
/// Messages are delivered in publish order to each subscriber and are not
/// retained after delivery.
#[async_trait]
pub trait PubSubStore: Send + Sync {
    /// Publish a payload, returning the number of subscribers that received it
    async fn publish(&self, channel: &str, payload: &str) -> Result<u64>;

    /// Subscribe to a channel
    async fn subscribe(&self, channel: &str) -> Result<MessageStream>;
}
