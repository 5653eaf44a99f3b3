//! Work queue configuration types

use crate::constants::FALLBACK_CONSUMER_NAME;
use gatehouse_domain::constants::{
    CLAIM_INTERVAL_CYCLES, CLAIM_MIN_IDLE_MS, LOG_BLOCK_MS, RETRY_BACKOFF_MS, WORK_BATCH_SIZE,
    WORK_GROUP_NAME, WORK_LOG_NAME,
};
use gatehouse_domain::value_objects::StreamPosition;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the consumer attaches to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueMode {
    /// Durable consumer group, at-least-once
    #[default]
    Group,
    /// Single cursor from the newest item, at-most-once
    Tail,
}

/// Where a newly created consumer group starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStart {
    /// Beginning of the log
    #[default]
    Start,
    /// Only items appended after creation
    Latest,
}

impl From<GroupStart> for StreamPosition {
    fn from(start: GroupStart) -> Self {
        match start {
            GroupStart::Start => StreamPosition::Start,
            GroupStart::Latest => StreamPosition::Latest,
        }
    }
}

/// Processor handling consumed work items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessorKind {
    /// Log each item
    #[default]
    Logging,
    /// Invalidate the cached feed for each item
    FeedRefresh,
}

/// Work queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Run the consumer
    pub enabled: bool,
    /// Attachment mode
    pub mode: QueueMode,
    /// Log receiving work items
    pub log_name: String,
    /// Consumer group name
    pub group: String,
    /// Start position of a newly created group
    pub group_start: GroupStart,
    /// Consumer name within the group, the hostname when unset
    ///
    /// Keep it stable across restarts so the consumer picks up its own
    /// pending items on startup.
    pub consumer: Option<String>,
    /// Items requested per read
    pub batch_size: usize,
    /// Longest single blocking read in milliseconds
    pub block_ms: u64,
    /// Delay after a failed read in milliseconds
    pub retry_backoff_ms: u64,
    /// Idle time before another consumer's pending item is claimed, in milliseconds
    pub claim_min_idle_ms: u64,
    /// Read cycles between claim passes
    pub claim_interval: u32,
    /// Approximate cap on log length, trimmed on append; unbounded when unset
    pub max_len: Option<usize>,
    /// Item processor
    pub processor: ProcessorKind,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: QueueMode::default(),
            log_name: WORK_LOG_NAME.to_string(),
            group: WORK_GROUP_NAME.to_string(),
            group_start: GroupStart::default(),
            consumer: None,
            batch_size: WORK_BATCH_SIZE,
            block_ms: LOG_BLOCK_MS,
            retry_backoff_ms: RETRY_BACKOFF_MS,
            claim_min_idle_ms: CLAIM_MIN_IDLE_MS,
            claim_interval: CLAIM_INTERVAL_CYCLES,
            max_len: None,
            processor: ProcessorKind::default(),
        }
    }
}

impl QueueConfig {
    /// Configured consumer name or the hostname
    pub fn consumer_name(&self) -> String {
        match self.consumer.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_consumer_name(),
        }
    }

    /// Longest single blocking read
    pub fn block(&self) -> Duration {
        Duration::from_millis(self.block_ms)
    }

    /// Delay after a failed read
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Claim idle threshold
    pub fn claim_min_idle(&self) -> Duration {
        Duration::from_millis(self.claim_min_idle_ms)
    }
}

/// Hostname of this machine, the same across process restarts
pub fn default_consumer_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_CONSUMER_NAME.to_string())
}
