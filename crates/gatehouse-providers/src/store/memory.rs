//! In-memory store provider
//!
//! Single-process implementation of every store port. Counters and values
//! share one key space with lazy expiry, pub/sub uses tokio broadcast
//! channels, and logs keep their consumer-group state next to the records.
//! Expiry and idle times use `tokio::time::Instant`, so tests can drive them
//! with a paused clock.
//!
//! ## Example
//!
//! ```ignore
//! use gatehouse_providers::store::InMemoryStoreProvider;
//!
//! let store = Arc::new(InMemoryStoreProvider::new());
//! let admission = AdmissionController::new(store.clone());
//! ```

use crate::constants::MEMORY_CHANNEL_CAPACITY;
use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream;
use gatehouse_domain::error::{Error, Result};
use gatehouse_domain::ports::{
    CounterStore, KeyTtl, KeyValueStore, LogStore, MessageStream, PubSubStore, StoreProvider,
};
use gatehouse_domain::value_objects::{
    GroupReadMode, PendingEntry, StreamPosition, WorkItem, WorkItemAttributes, WorkItemId,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{Notify, broadcast};
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug)]
struct PendingState {
    consumer: String,
    delivery_count: u64,
    delivered_at: Instant,
}

#[derive(Debug, Default)]
struct GroupState {
    last_delivered: WorkItemId,
    pending: BTreeMap<WorkItemId, PendingState>,
}

#[derive(Debug, Default)]
struct LogState {
    items: Vec<WorkItem>,
    last_id: WorkItemId,
    groups: HashMap<String, GroupState>,
}

impl LogState {
    fn after(&self, id: WorkItemId, count: usize) -> Vec<WorkItem> {
        let start = self.items.partition_point(|item| item.id <= id);
        self.items.iter().skip(start).take(count).cloned().collect()
    }
}

/// In-process store provider
pub struct InMemoryStoreProvider {
    entries: DashMap<String, Entry>,
    channels: DashMap<String, broadcast::Sender<String>>,
    logs: Mutex<HashMap<String, LogState>>,
    appended: Notify,
    unavailable: AtomicBool,
}

impl InMemoryStoreProvider {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            channels: DashMap::new(),
            logs: Mutex::new(HashMap::new()),
            appended: Notify::new(),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make every subsequent operation fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of live subscriptions on a channel
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// End every open subscription stream
    pub fn disconnect_subscribers(&self) {
        self.channels.clear();
    }

    /// Delete a log along with its consumer groups
    ///
    /// Blocked group readers wake up and fail with `NotFound`. Returns
    /// `false` when the log did not exist.
    pub fn drop_log(&self, log: &str) -> Result<bool> {
        let dropped = self.logs()?.remove(log).is_some();
        self.appended.notify_waiters();
        Ok(dropped)
    }

    fn push(
        &self,
        log: &str,
        attributes: &WorkItemAttributes,
        max_len: Option<usize>,
    ) -> Result<WorkItemId> {
        self.check_available()?;
        let id = {
            let mut logs = self.logs()?;
            let state = logs.entry(log.to_string()).or_default();
            let id = state.last_id.successor(Self::now_millis());
            state.last_id = id;
            state.items.push(WorkItem::new(id, attributes.clone()));
            if let Some(max_len) = max_len {
                let excess = state.items.len().saturating_sub(max_len);
                state.items.drain(..excess);
            }
            id
        };
        self.appended.notify_waiters();
        Ok(id)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::store_unavailable("In-memory store marked unavailable"));
        }
        Ok(())
    }

    fn logs(&self) -> Result<MutexGuard<'_, HashMap<String, LogState>>> {
        self.logs
            .lock()
            .map_err(|_| Error::internal("In-memory log state poisoned"))
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }

    fn missing_group(log: &str, group: &str) -> Error {
        Error::not_found(format!("consumer group '{group}' on log '{log}'"))
    }

    fn read_now(
        &self,
        log: &str,
        position: StreamPosition,
        count: usize,
    ) -> Result<(Vec<WorkItem>, WorkItemId)> {
        let logs = self.logs()?;
        let Some(state) = logs.get(log) else {
            return Ok((Vec::new(), WorkItemId::MIN));
        };
        let items = match position {
            StreamPosition::Start => state.after(WorkItemId::MIN, count),
            StreamPosition::Latest => Vec::new(),
            StreamPosition::After(id) => state.after(id, count),
        };
        Ok((items, state.last_id))
    }

    fn read_group_now(
        &self,
        log: &str,
        group: &str,
        consumer: &str,
        mode: GroupReadMode,
        count: usize,
    ) -> Result<Vec<WorkItem>> {
        let now = Instant::now();
        let mut logs = self.logs()?;
        let state = logs
            .get_mut(log)
            .ok_or_else(|| Self::missing_group(log, group))?;
        let LogState { items, groups, .. } = state;
        let group_state = groups
            .get_mut(group)
            .ok_or_else(|| Self::missing_group(log, group))?;

        match mode {
            GroupReadMode::New => {
                let start = items.partition_point(|item| item.id <= group_state.last_delivered);
                let delivered: Vec<WorkItem> =
                    items.iter().skip(start).take(count).cloned().collect();
                for item in &delivered {
                    group_state.last_delivered = item.id;
                    group_state.pending.insert(
                        item.id,
                        PendingState {
                            consumer: consumer.to_string(),
                            delivery_count: 1,
                            delivered_at: now,
                        },
                    );
                }
                Ok(delivered)
            }
            GroupReadMode::PendingAfter(after) => {
                let mut delivered = Vec::new();
                for (id, pending) in group_state.pending.range_mut(after..) {
                    if delivered.len() >= count {
                        break;
                    }
                    if *id == after || pending.consumer != consumer {
                        continue;
                    }
                    if let Ok(idx) = items.binary_search_by_key(id, |item| item.id) {
                        pending.delivery_count += 1;
                        pending.delivered_at = now;
                        delivered.push(items[idx].clone());
                    }
                }
                Ok(delivered)
            }
        }
    }
}

impl Default for InMemoryStoreProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStoreProvider")
            .field("entries", &self.entries.len())
            .field("channels", &self.channels.len())
            .field("unavailable", &self.unavailable.load(Ordering::SeqCst))
            .finish()
    }
}

#[async_trait]
impl CounterStore for InMemoryStoreProvider {
    async fn increment(&self, key: &str) -> Result<u64> {
        self.check_available()?;
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new("0"));
        if entry.is_expired(now) {
            *entry = Entry::new("0");
        }
        let current: u64 = entry.value.parse().map_err(|_| {
            Error::infrastructure(format!("Value at '{key}' is not an integer"))
        })?;
        let next = current + 1;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        self.check_available()?;
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        self.check_available()?;
        let now = Instant::now();
        Ok(match self.entries.get(key) {
            None => KeyTtl::Missing,
            Some(entry) => match entry.expires_at {
                Some(at) if at <= now => KeyTtl::Missing,
                Some(at) => KeyTtl::Expires(at - now),
                None => KeyTtl::Persistent,
            },
        })
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStoreProvider {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        let now = Instant::now();
        match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.check_available()?;
        let entry = Entry {
            value: value.to_string(),
            expires_at: Some(Instant::now() + ttl),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.check_available()?;
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }
}

#[async_trait]
impl PubSubStore for InMemoryStoreProvider {
    async fn publish(&self, channel: &str, payload: &str) -> Result<u64> {
        self.check_available()?;
        let receivers = match self.channels.get(channel) {
            Some(tx) => tx.send(payload.to_string()).unwrap_or(0),
            None => 0,
        };
        debug!(channel, receivers, "Published message");
        Ok(receivers as u64)
    }

    async fn subscribe(&self, channel: &str) -> Result<MessageStream> {
        self.check_available()?;
        let receiver = self
            .channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(MEMORY_CHANNEL_CAPACITY).0)
            .subscribe();

        let channel = channel.to_string();
        let stream = stream::unfold(receiver, move |mut rx| {
            let channel = channel.clone();
            async move {
                loop {
                    match rx.recv().await {
                        Ok(payload) => return Some((payload, rx)),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(channel = %channel, skipped = n, "Subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl LogStore for InMemoryStoreProvider {
    async fn append(&self, log: &str, attributes: &WorkItemAttributes) -> Result<WorkItemId> {
        self.push(log, attributes, None)
    }

    async fn append_capped(
        &self,
        log: &str,
        attributes: &WorkItemAttributes,
        max_len: usize,
    ) -> Result<WorkItemId> {
        self.push(log, attributes, Some(max_len))
    }

    async fn latest_id(&self, log: &str) -> Result<Option<WorkItemId>> {
        self.check_available()?;
        let logs = self.logs()?;
        Ok(logs
            .get(log)
            .and_then(|state| state.items.last())
            .map(|item| item.id))
    }

    async fn read(
        &self,
        log: &str,
        position: StreamPosition,
        count: usize,
        block: Option<Duration>,
    ) -> Result<Vec<WorkItem>> {
        let deadline = block.map(|b| Instant::now() + b);
        let mut position = position;

        loop {
            self.check_available()?;
            let notified = self.appended.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let (items, last_id) = self.read_now(log, position, count)?;
            if !items.is_empty() {
                return Ok(items);
            }
            let Some(deadline) = deadline else {
                return Ok(items);
            };
            // "$" means entries appended after the call started
            if position == StreamPosition::Latest {
                position = StreamPosition::After(last_id);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(Vec::new());
            }
        }
    }

    async fn create_group(&self, log: &str, group: &str, start: StreamPosition) -> Result<bool> {
        self.check_available()?;
        let mut logs = self.logs()?;
        let state = logs.entry(log.to_string()).or_default();
        if state.groups.contains_key(group) {
            return Ok(false);
        }
        let last_delivered = match start {
            StreamPosition::Start => WorkItemId::MIN,
            StreamPosition::Latest => state.last_id,
            StreamPosition::After(id) => id,
        };
        state.groups.insert(
            group.to_string(),
            GroupState {
                last_delivered,
                pending: BTreeMap::new(),
            },
        );
        Ok(true)
    }

    async fn read_group(
        &self,
        log: &str,
        group: &str,
        consumer: &str,
        mode: GroupReadMode,
        count: usize,
        block: Option<Duration>,
    ) -> Result<Vec<WorkItem>> {
        // History reads never block
        let deadline = match mode {
            GroupReadMode::New => block.map(|b| Instant::now() + b),
            GroupReadMode::PendingAfter(_) => None,
        };

        loop {
            self.check_available()?;
            let notified = self.appended.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let items = self.read_group_now(log, group, consumer, mode, count)?;
            if !items.is_empty() {
                return Ok(items);
            }
            let Some(deadline) = deadline else {
                return Ok(items);
            };
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(Vec::new());
            }
        }
    }

    async fn acknowledge(&self, log: &str, group: &str, id: WorkItemId) -> Result<bool> {
        self.check_available()?;
        let mut logs = self.logs()?;
        Ok(logs
            .get_mut(log)
            .and_then(|state| state.groups.get_mut(group))
            .is_some_and(|group| group.pending.remove(&id).is_some()))
    }

    async fn pending(&self, log: &str, group: &str, count: usize) -> Result<Vec<PendingEntry>> {
        self.check_available()?;
        let now = Instant::now();
        let logs = self.logs()?;
        let group_state = logs
            .get(log)
            .and_then(|state| state.groups.get(group))
            .ok_or_else(|| Self::missing_group(log, group))?;
        Ok(group_state
            .pending
            .iter()
            .take(count)
            .map(|(id, pending)| PendingEntry {
                id: *id,
                consumer: pending.consumer.clone(),
                idle: now.saturating_duration_since(pending.delivered_at),
                delivery_count: pending.delivery_count,
            })
            .collect())
    }

    async fn claim_idle(
        &self,
        log: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> Result<Vec<WorkItem>> {
        self.check_available()?;
        let now = Instant::now();
        let mut logs = self.logs()?;
        let state = logs
            .get_mut(log)
            .ok_or_else(|| Self::missing_group(log, group))?;
        let LogState { items, groups, .. } = state;
        let group_state = groups
            .get_mut(group)
            .ok_or_else(|| Self::missing_group(log, group))?;

        let mut claimed = Vec::new();
        let mut trimmed = Vec::new();
        for (id, pending) in group_state.pending.iter_mut() {
            if claimed.len() >= count {
                break;
            }
            if now.saturating_duration_since(pending.delivered_at) < min_idle {
                continue;
            }
            match items.binary_search_by_key(id, |item| item.id) {
                Ok(idx) => {
                    pending.consumer = consumer.to_string();
                    pending.delivery_count += 1;
                    pending.delivered_at = now;
                    claimed.push(items[idx].clone());
                }
                // Record trimmed away, nothing left to deliver
                Err(_) => trimmed.push(*id),
            }
        }
        for id in trimmed {
            group_state.pending.remove(&id);
        }
        Ok(claimed)
    }
}

#[async_trait]
impl StoreProvider for InMemoryStoreProvider {
    async fn ping(&self) -> Result<()> {
        self.check_available()
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use gatehouse_application::ports::registry::{
    STORE_PROVIDERS, StoreProviderConfig, StoreProviderEntry,
};

fn memory_store_factory(
    _config: &StoreProviderConfig,
) -> std::result::Result<Arc<dyn StoreProvider>, String> {
    Ok(Arc::new(InMemoryStoreProvider::new()))
}

#[linkme::distributed_slice(STORE_PROVIDERS)]
static MEMORY_STORE: StoreProviderEntry = StoreProviderEntry {
    name: "memory",
    description: "In-process store for tests and single-instance development",
    factory: memory_store_factory,
};
