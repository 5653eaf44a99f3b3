//! Append-only log port with consumer groups

use crate::error::Result;
use crate::value_objects::{
    GroupReadMode, PendingEntry, StreamPosition, WorkItem, WorkItemAttributes, WorkItemId,
};
use async_trait::async_trait;
use std::time::Duration;

/// Durable ordered log
///
/// Ids are assigned by the store, strictly increase within a log and are
/// never reused. A `block` of `None` returns immediately; `Some(d)` waits up
/// to `d` for data before returning an empty batch.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Atomically append one record
    async fn append(&self, log: &str, attributes: &WorkItemAttributes) -> Result<WorkItemId>;

    /// Append one record, then trim the oldest records beyond `max_len`
    ///
    /// Trimming may be approximate: the log keeps at least `max_len`
    /// records, possibly a few more.
    async fn append_capped(
        &self,
        log: &str,
        attributes: &WorkItemAttributes,
        max_len: usize,
    ) -> Result<WorkItemId>;

    /// Id of the newest record, `None` for an empty or missing log
    async fn latest_id(&self, log: &str) -> Result<Option<WorkItemId>>;

    /// Read up to `count` records after `position`
    async fn read(
        &self,
        log: &str,
        position: StreamPosition,
        count: usize,
        block: Option<Duration>,
    ) -> Result<Vec<WorkItem>>;

    /// Create a consumer group starting at `start`, creating the log if needed
    ///
    /// Idempotent: returns `false` when the group already exists.
    async fn create_group(&self, log: &str, group: &str, start: StreamPosition) -> Result<bool>;

    /// Read on behalf of `consumer`, marking delivered records pending
    async fn read_group(
        &self,
        log: &str,
        group: &str,
        consumer: &str,
        mode: GroupReadMode,
        count: usize,
        block: Option<Duration>,
    ) -> Result<Vec<WorkItem>>;

    /// Remove a record from the group's pending set
    ///
    /// Returns `false` when the record was not pending.
    async fn acknowledge(&self, log: &str, group: &str, id: WorkItemId) -> Result<bool>;

    /// List up to `count` pending entries of the group, oldest first
    async fn pending(&self, log: &str, group: &str, count: usize) -> Result<Vec<PendingEntry>>;

    /// Transfer pending entries idle for at least `min_idle` to `consumer`
    async fn claim_idle(
        &self,
        log: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> Result<Vec<WorkItem>>;
}
