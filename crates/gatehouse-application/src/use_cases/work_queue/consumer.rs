//! Work Queue Consumer
//!
//! Long-running loop delivering log items to a [`WorkItemProcessor`]. Reads
//! block for a bounded time and then loop, so cancellation is observed between
//! reads. In-flight items always finish processing before the loop exits, and
//! in group mode so does everything the last read delivered.

use crate::domain_services::WorkItemProcessor;
use gatehouse_domain::constants::{
    CLAIM_INTERVAL_CYCLES, CLAIM_MIN_IDLE_MS, LOG_BLOCK_MS, RETRY_BACKOFF_MS, WORK_BATCH_SIZE,
    WORK_GROUP_NAME, WORK_LOG_NAME,
};
use gatehouse_domain::error::{Error, Result};
use gatehouse_domain::ports::LogStore;
use gatehouse_domain::value_objects::{GroupReadMode, StreamPosition, WorkItem, WorkItemId};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How a consumer attaches to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerMode {
    /// Durable consumer group with acknowledgements
    Group {
        /// Group name
        group: String,
        /// Consumer name within the group
        consumer: String,
        /// Where a newly created group starts
        start: StreamPosition,
    },
    /// Plain tail from the newest item at startup
    Tail,
}

/// Consumer loop settings
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    /// Log to consume
    pub log_name: String,
    /// Attachment mode
    pub mode: ConsumerMode,
    /// Items requested per read
    pub batch_size: usize,
    /// Longest time a single read waits for data
    pub block: Duration,
    /// Delay after a failed read
    pub retry_backoff: Duration,
    /// Idle time after which another consumer's pending item is claimed
    pub claim_min_idle: Duration,
    /// Read cycles between claim passes
    pub claim_interval: u32,
}

impl ConsumerSettings {
    /// Group-mode settings with defaults
    pub fn group(consumer: impl Into<String>) -> Self {
        Self {
            mode: ConsumerMode::Group {
                group: WORK_GROUP_NAME.to_string(),
                consumer: consumer.into(),
                start: StreamPosition::Start,
            },
            ..Self::tail()
        }
    }

    /// Tail-mode settings with defaults
    pub fn tail() -> Self {
        Self {
            log_name: WORK_LOG_NAME.to_string(),
            mode: ConsumerMode::Tail,
            batch_size: WORK_BATCH_SIZE,
            block: Duration::from_millis(LOG_BLOCK_MS),
            retry_backoff: Duration::from_millis(RETRY_BACKOFF_MS),
            claim_min_idle: Duration::from_millis(CLAIM_MIN_IDLE_MS),
            claim_interval: CLAIM_INTERVAL_CYCLES,
        }
    }

    /// Consume a different log
    pub fn with_log_name(mut self, log_name: impl Into<String>) -> Self {
        self.log_name = log_name.into();
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the read block time
    pub fn with_block(mut self, block: Duration) -> Self {
        self.block = block;
        self
    }

    /// Set the retry backoff
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Set the claim idle threshold
    pub fn with_claim_min_idle(mut self, min_idle: Duration) -> Self {
        self.claim_min_idle = min_idle;
        self
    }

    /// Set the number of read cycles between claim passes
    pub fn with_claim_interval(mut self, cycles: u32) -> Self {
        self.claim_interval = cycles;
        self
    }
}

/// Counters reported when a consumer loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Items handed to the processor
    pub delivered: u64,
    /// Items processed and acknowledged (group mode) or processed (tail mode)
    pub completed: u64,
    /// Items whose processing failed
    pub failed: u64,
}

/// How a group consuming session ended
enum GroupSession {
    Cancelled,
    GroupLost,
}

/// Drives a processor from a log
pub struct WorkQueueConsumer {
    log: Arc<dyn LogStore>,
    processor: Arc<dyn WorkItemProcessor>,
    settings: ConsumerSettings,
}

impl WorkQueueConsumer {
    /// Create a consumer
    pub fn new(
        log: Arc<dyn LogStore>,
        processor: Arc<dyn WorkItemProcessor>,
        settings: ConsumerSettings,
    ) -> Self {
        Self {
            log,
            processor,
            settings,
        }
    }

    /// Loop settings
    pub fn settings(&self) -> &ConsumerSettings {
        &self.settings
    }

    /// Run until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) -> ConsumerStats {
        let stats = match &self.settings.mode {
            ConsumerMode::Group {
                group,
                consumer,
                start,
            } => self.run_group(group, consumer, *start, &cancel).await,
            ConsumerMode::Tail => self.run_tail(&cancel).await,
        };
        info!(
            log = %self.settings.log_name,
            processor = self.processor.name(),
            delivered = stats.delivered,
            completed = stats.completed,
            failed = stats.failed,
            "Work queue consumer stopped"
        );
        stats
    }

    async fn run_group(
        &self,
        group: &str,
        consumer: &str,
        start: StreamPosition,
        cancel: &CancellationToken,
    ) -> ConsumerStats {
        let mut stats = ConsumerStats::default();
        let log_name = self.settings.log_name.as_str();

        while !cancel.is_cancelled() {
            let joined = self
                .retry_until_ok(cancel, "create consumer group", || {
                    self.log.create_group(log_name, group, start)
                })
                .await;
            match joined {
                Some(true) => info!(log = log_name, group, "Consumer group created"),
                Some(false) => debug!(log = log_name, group, "Consumer group already exists"),
                None => break,
            }
            info!(log = log_name, group, consumer, "Group consumer started");

            self.recover_own_pending(group, consumer, cancel, &mut stats)
                .await;

            match self.consume_group(group, consumer, cancel, &mut stats).await {
                GroupSession::Cancelled => break,
                GroupSession::GroupLost => {
                    warn!(log = log_name, group, "Consumer group disappeared, joining again");
                    if !self.backoff(cancel).await {
                        break;
                    }
                }
            }
        }
        stats
    }

    /// Read, process and acknowledge until cancelled or the group is gone
    ///
    /// The read is never abandoned midway: the store may already have marked
    /// its items pending for this consumer, so they are processed before
    /// cancellation is honoured. Reads are bounded by the block time.
    async fn consume_group(
        &self,
        group: &str,
        consumer: &str,
        cancel: &CancellationToken,
        stats: &mut ConsumerStats,
    ) -> GroupSession {
        let log_name = self.settings.log_name.as_str();
        let mut cycle: u32 = 0;

        while !cancel.is_cancelled() {
            if cycle % self.settings.claim_interval.max(1) == 0 {
                self.claim_idle(group, consumer, stats).await;
            }
            cycle = cycle.wrapping_add(1);

            let read = self
                .log
                .read_group(
                    log_name,
                    group,
                    consumer,
                    GroupReadMode::New,
                    self.settings.batch_size,
                    Some(self.settings.block),
                )
                .await;

            match read {
                Ok(items) => {
                    for item in items {
                        self.process_and_ack(group, &item, stats).await;
                    }
                }
                Err(Error::NotFound { .. }) => return GroupSession::GroupLost,
                Err(e) => {
                    warn!(log = log_name, group, error = %e, "Work queue read failed");
                    if !self.backoff(cancel).await {
                        break;
                    }
                }
            }
        }
        GroupSession::Cancelled
    }

    /// Process items delivered to this consumer before a restart
    async fn recover_own_pending(
        &self,
        group: &str,
        consumer: &str,
        cancel: &CancellationToken,
        stats: &mut ConsumerStats,
    ) {
        let log_name = self.settings.log_name.as_str();
        let mut after = WorkItemId::MIN;

        while !cancel.is_cancelled() {
            let read = self
                .log
                .read_group(
                    log_name,
                    group,
                    consumer,
                    GroupReadMode::PendingAfter(after),
                    self.settings.batch_size,
                    None,
                )
                .await;
            let items = match read {
                Ok(items) if items.is_empty() => return,
                Ok(items) => items,
                // Group vanished; the main read loop notices and rejoins
                Err(Error::NotFound { .. }) => return,
                Err(e) => {
                    warn!(log = log_name, group, error = %e, "Pending history read failed");
                    if !self.backoff(cancel).await {
                        return;
                    }
                    continue;
                }
            };
            info!(log = log_name, consumer, count = items.len(), "Recovering pending items");
            for item in items {
                after = item.id;
                self.process_and_ack(group, &item, stats).await;
            }
        }
    }

    /// Take over items left pending by consumers that stopped
    async fn claim_idle(&self, group: &str, consumer: &str, stats: &mut ConsumerStats) {
        let log_name = self.settings.log_name.as_str();
        let claimed = self
            .log
            .claim_idle(
                log_name,
                group,
                consumer,
                self.settings.claim_min_idle,
                self.settings.batch_size,
            )
            .await;

        match claimed {
            Ok(items) => {
                if !items.is_empty() {
                    info!(log = log_name, consumer, count = items.len(), "Claimed idle items");
                }
                for item in items {
                    self.process_and_ack(group, &item, stats).await;
                }
            }
            Err(e) => warn!(log = log_name, group, error = %e, "Claiming idle items failed"),
        }
    }

    async fn process_and_ack(&self, group: &str, item: &WorkItem, stats: &mut ConsumerStats) {
        let log_name = self.settings.log_name.as_str();
        stats.delivered += 1;

        if let Err(e) = self.processor.process(item).await {
            stats.failed += 1;
            error!(log = log_name, id = %item.id, error = %e, "Work item processing failed, leaving it pending");
            return;
        }

        match self.log.acknowledge(log_name, group, item.id).await {
            Ok(_) => {
                stats.completed += 1;
                debug!(log = log_name, id = %item.id, "Work item acknowledged");
            }
            Err(e) => {
                warn!(log = log_name, id = %item.id, error = %e, "Acknowledge failed, item will be redelivered");
            }
        }
    }

    async fn run_tail(&self, cancel: &CancellationToken) -> ConsumerStats {
        let mut stats = ConsumerStats::default();
        let log_name = self.settings.log_name.as_str();

        // Resolve "only new" once so items appended between reads are not missed
        let Some(latest) = self
            .retry_until_ok(cancel, "resolve log tail", || self.log.latest_id(log_name))
            .await
        else {
            return stats;
        };
        let mut cursor = latest.unwrap_or(WorkItemId::MIN);
        info!(log = log_name, cursor = %cursor, "Tail consumer started");

        while !cancel.is_cancelled() {
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                read = self.log.read(
                    log_name,
                    StreamPosition::After(cursor),
                    self.settings.batch_size,
                    Some(self.settings.block),
                ) => read,
            };

            match read {
                Ok(items) => {
                    for item in items {
                        stats.delivered += 1;
                        match self.processor.process(&item).await {
                            Ok(()) => stats.completed += 1,
                            Err(e) => {
                                stats.failed += 1;
                                error!(log = log_name, id = %item.id, error = %e, "Work item processing failed");
                            }
                        }
                        cursor = item.id;
                    }
                }
                Err(e) => {
                    warn!(log = log_name, error = %e, "Work queue read failed");
                    if !self.backoff(cancel).await {
                        break;
                    }
                }
            }
        }
        stats
    }

    /// Retry `op` with backoff until it succeeds; `None` when cancelled first
    async fn retry_until_ok<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        what: &str,
        mut op: F,
    ) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        loop {
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                attempt = op() => attempt,
            };
            match attempt {
                Ok(value) => return Some(value),
                Err(e) => {
                    warn!(log = %self.settings.log_name, error = %e, "Failed to {what}, retrying");
                    if !self.backoff(cancel).await {
                        return None;
                    }
                }
            }
        }
    }

    /// Sleep for the retry backoff; `false` when cancelled meanwhile
    async fn backoff(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.settings.retry_backoff) => true,
        }
    }
}

impl std::fmt::Debug for WorkQueueConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkQueueConsumer")
            .field("processor", &self.processor.name())
            .field("settings", &self.settings)
            .finish()
    }
}
