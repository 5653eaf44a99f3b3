//! Cache Invalidation Use Cases
//!
//! The listener subscribes to the invalidation channel and deletes the named
//! keys one notice at a time, in publish order. A lost subscription is
//! re-established after a backoff. The publisher is the sending side used by
//! anything that changes origin data.

use futures::StreamExt;
use gatehouse_domain::constants::{INVALIDATION_CHANNEL, RESOURCE_FEED_KEY, RETRY_BACKOFF_MS};
use gatehouse_domain::error::Result;
use gatehouse_domain::ports::{KeyValueStore, PubSubStore};
use gatehouse_domain::value_objects::InvalidationNotice;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Background listener evicting keys named on the invalidation channel
pub struct InvalidationListener {
    pubsub: Arc<dyn PubSubStore>,
    cache: Arc<dyn KeyValueStore>,
    channel: String,
    default_keys: Vec<String>,
    retry_backoff: Duration,
}

impl InvalidationListener {
    /// Create a listener on the default channel
    ///
    /// Notices naming no key evict the resource feed.
    pub fn new(pubsub: Arc<dyn PubSubStore>, cache: Arc<dyn KeyValueStore>) -> Self {
        Self {
            pubsub,
            cache,
            channel: INVALIDATION_CHANNEL.to_string(),
            default_keys: vec![RESOURCE_FEED_KEY.to_string()],
            retry_backoff: Duration::from_millis(RETRY_BACKOFF_MS),
        }
    }

    /// Listen on a different channel
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Keys evicted by notices that name none
    pub fn with_default_keys(mut self, keys: Vec<String>) -> Self {
        self.default_keys = keys;
        self
    }

    /// Delay before resubscribing
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Channel this listener subscribes to
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Run until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) {
        info!(channel = %self.channel, "Invalidation listener started");

        loop {
            let subscribed = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                subscribed = self.pubsub.subscribe(&self.channel) => subscribed,
            };

            match subscribed {
                Ok(mut messages) => loop {
                    let message = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            info!(channel = %self.channel, "Invalidation listener stopped");
                            return;
                        }
                        message = messages.next() => message,
                    };
                    match message {
                        Some(payload) => {
                            self.apply(&payload).await;
                        }
                        None => {
                            warn!(channel = %self.channel, "Invalidation subscription lost");
                            break;
                        }
                    }
                },
                Err(e) => {
                    warn!(channel = %self.channel, error = %e, "Invalidation subscribe failed");
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.retry_backoff) => {}
            }
        }

        info!(channel = %self.channel, "Invalidation listener stopped");
    }

    /// Apply one notice payload, returning how many keys were deleted
    ///
    /// Malformed payloads and failed deletes are logged and skipped.
    pub async fn apply(&self, payload: &str) -> usize {
        let notice = match InvalidationNotice::parse(payload) {
            Ok(notice) => notice,
            Err(e) => {
                warn!(channel = %self.channel, error = %e, "Ignoring invalidation notice");
                return 0;
            }
        };

        let keys = if notice.is_empty() {
            &self.default_keys
        } else {
            &notice.keys
        };

        let mut deleted = 0;
        for key in keys {
            match self.cache.delete(key).await {
                Ok(true) => {
                    info!(key = %key, "Cache entry invalidated");
                    deleted += 1;
                }
                Ok(false) => debug!(key = %key, "Cache entry already absent"),
                Err(e) => error!(key = %key, error = %e, "Cache invalidation failed"),
            }
        }
        deleted
    }
}

impl std::fmt::Debug for InvalidationListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationListener")
            .field("channel", &self.channel)
            .field("default_keys", &self.default_keys)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}

/// Sends invalidation notices
#[derive(Clone)]
pub struct InvalidationPublisher {
    pubsub: Arc<dyn PubSubStore>,
    channel: String,
}

impl InvalidationPublisher {
    /// Create a publisher for the given channel
    pub fn new(pubsub: Arc<dyn PubSubStore>, channel: impl Into<String>) -> Self {
        Self {
            pubsub,
            channel: channel.into(),
        }
    }

    /// Publish a notice naming `keys`, returning the number of receivers
    pub async fn publish_invalidation<I, S>(&self, keys: I) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let notice = InvalidationNotice::for_keys(keys);
        let payload = notice.to_payload()?;
        let receivers = self.pubsub.publish(&self.channel, &payload).await?;
        debug!(channel = %self.channel, keys = ?notice.keys, receivers, "Invalidation published");
        Ok(receivers)
    }
}

impl std::fmt::Debug for InvalidationPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationPublisher")
            .field("channel", &self.channel)
            .finish()
    }
}
