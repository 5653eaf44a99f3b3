//! Redis store provider
//!
//! Distributed store shared by every Gatehouse instance.
//!
//! ## Connections
//!
//! - Short commands go through a lazily created `ConnectionManager`
//!   (multiplexed, reconnects on its own) and are bounded by the operation
//!   timeout.
//! - Each subscription opens its own pub/sub connection.
//! - Blocking log reads run on a dedicated synchronous connection inside
//!   `spawn_blocking`, with a socket read timeout slightly above the BLOCK
//!   window.
//!
//! ## Example
//!
//! ```ignore
//! use gatehouse_providers::store::RedisStoreProvider;
//!
//! let provider = RedisStoreProvider::new("redis://localhost:6379")?;
//! // Or with host/port
//! let provider = RedisStoreProvider::with_host_port("localhost", 6379)?;
//! ```

use crate::constants::{
    REDIS_BLOCK_READ_MARGIN_MS, REDIS_DEFAULT_PORT, REDIS_DEFAULT_USERNAME,
    REDIS_OPERATION_TIMEOUT_SECS,
};
use async_trait::async_trait;
use futures::StreamExt;
use gatehouse_domain::error::{Error, Result};
use gatehouse_domain::ports::{
    CounterStore, KeyTtl, KeyValueStore, LogStore, MessageStream, PubSubStore, StoreProvider,
};
use gatehouse_domain::value_objects::{
    GroupReadMode, PendingEntry, StreamPosition, WorkItem, WorkItemAttributes, WorkItemId,
};
use redis::aio::ConnectionManager;
use redis::streams::{StreamAutoClaimReply, StreamId, StreamRangeReply, StreamReadReply};
use redis::{
    Client, Cmd, FromRedisValue, IntoConnectionInfo, RedisConnectionInfo, RedisError, RedisResult,
};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Map a Redis error to the domain taxonomy
///
/// Connection-level failures are `StoreUnavailable`, a missing stream or
/// group (`NOGROUP`) is `NotFound`, other server errors are `Infrastructure`.
fn redis_error(op: &str, e: RedisError) -> Error {
    let message = format!("Redis {op} failed: {e}");
    if e.code() == Some("NOGROUP") {
        return Error::not_found(message);
    }
    if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() || e.is_connection_refusal()
    {
        Error::store_unavailable_with_source(message, e)
    } else {
        Error::infrastructure_with_source(message, e)
    }
}

fn to_work_item(entry: &StreamId) -> Result<WorkItem> {
    let id: WorkItemId = entry.id.parse()?;
    let mut attributes = WorkItemAttributes::new();
    for field in entry.map.keys() {
        if let Some(value) = entry.get::<String>(field) {
            attributes.insert(field.clone(), value);
        }
    }
    Ok(WorkItem::new(id, attributes))
}

fn read_reply_items(reply: Option<StreamReadReply>) -> Result<Vec<WorkItem>> {
    let Some(reply) = reply else {
        return Ok(Vec::new());
    };
    reply
        .keys
        .iter()
        .flat_map(|key| key.ids.iter())
        .map(to_work_item)
        .collect()
}

/// Redis store provider
#[derive(Clone)]
pub struct RedisStoreProvider {
    client: Client,
    manager: Arc<OnceCell<ConnectionManager>>,
    blocking: Arc<Mutex<Option<redis::Connection>>>,
    address: String,
    timeout: Duration,
}

impl RedisStoreProvider {
    /// Create a provider from a connection URL
    ///
    /// No connection is made until the first command.
    pub fn new(connection_string: &str) -> Result<Self> {
        Self::open(connection_string)
    }

    /// Create a provider with host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::open((host, port))
    }

    /// Create a provider with host, port and credentials
    ///
    /// A password without a username authenticates as `default`.
    pub fn with_credentials(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: &str,
    ) -> Result<Self> {
        let settings = RedisConnectionInfo::default()
            .set_username(username.unwrap_or(REDIS_DEFAULT_USERNAME))
            .set_password(password);
        let info = (host, port)
            .into_connection_info()
            .map_err(|e| Error::configuration_with_source(format!("Invalid Redis address: {e}"), e))?
            .set_redis_settings(settings);
        Self::open(info)
    }

    fn open<T: IntoConnectionInfo>(info: T) -> Result<Self> {
        let client = Client::open(info).map_err(|e| {
            Error::configuration_with_source(format!("Invalid Redis URL: {e}"), e)
        })?;
        let address = client.get_connection_info().addr().to_string();

        Ok(Self {
            client,
            manager: Arc::new(OnceCell::new()),
            blocking: Arc::new(Mutex::new(None)),
            address,
            timeout: Duration::from_secs(REDIS_OPERATION_TIMEOUT_SECS),
        })
    }

    /// Username and password the client authenticates with
    pub fn credentials(&self) -> (Option<&str>, Option<&str>) {
        let settings = self.client.get_connection_info().redis_settings();
        (settings.username(), settings.password())
    }

    /// Bound short commands and connection attempts
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Server address, without credentials
    pub fn server_address(&self) -> &str {
        &self.address
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let client = self.client.clone();
        let init = self
            .manager
            .get_or_try_init(|| async move { ConnectionManager::new(client).await });
        match tokio::time::timeout(self.timeout, init).await {
            Ok(Ok(manager)) => Ok(manager.clone()),
            Ok(Err(e)) => Err(redis_error("connect", e)),
            Err(_) => Err(Error::store_unavailable(format!(
                "Redis connection to {} timed out after {:?}",
                self.address, self.timeout
            ))),
        }
    }

    async fn bounded<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(redis_error(op, e)),
            Err(_) => Err(Error::store_unavailable(format!(
                "Redis {op} timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn query<T: FromRedisValue>(&self, op: &str, cmd: &Cmd) -> Result<T> {
        let mut conn = self.connection().await?;
        self.bounded(op, cmd.query_async::<T>(&mut conn)).await
    }

    async fn xadd(
        &self,
        log: &str,
        attributes: &WorkItemAttributes,
        max_len: Option<usize>,
    ) -> Result<WorkItemId> {
        let mut cmd = redis::cmd("XADD");
        cmd.arg(log);
        if let Some(max_len) = max_len {
            cmd.arg("MAXLEN").arg("~").arg(max_len);
        }
        cmd.arg("*");
        for (field, value) in attributes {
            cmd.arg(field).arg(value);
        }
        let id: String = self.query("XADD", &cmd).await?;
        id.parse()
    }

    /// Run a command that may block server-side for up to `block`
    async fn query_blocking<T>(&self, op: &'static str, cmd: Cmd, block: Duration) -> Result<T>
    where
        T: FromRedisValue + Send + 'static,
    {
        let client = self.client.clone();
        let slot = Arc::clone(&self.blocking);
        let connect_timeout = self.timeout;
        let read_timeout = block + Duration::from_millis(REDIS_BLOCK_READ_MARGIN_MS);

        let joined = tokio::task::spawn_blocking(move || -> Result<T> {
            let mut guard = slot
                .lock()
                .map_err(|_| Error::internal("Redis blocking connection poisoned"))?;
            if guard.is_none() {
                let conn = client
                    .get_connection_with_timeout(connect_timeout)
                    .map_err(|e| redis_error("connect", e))?;
                *guard = Some(conn);
            }
            let Some(conn) = guard.as_mut() else {
                return Err(Error::internal("Redis blocking connection missing"));
            };
            conn.set_read_timeout(Some(read_timeout))
                .map_err(|e| redis_error(op, e))?;

            match cmd.query::<T>(conn) {
                Ok(value) => Ok(value),
                Err(e) => {
                    // Connection state is unknown after a failed blocking read
                    *guard = None;
                    Err(redis_error(op, e))
                }
            }
        })
        .await;

        joined.map_err(|e| Error::internal(format!("Redis blocking task failed: {e}")))?
    }

    /// Blocking when `block` is a positive duration, plain query otherwise
    async fn query_maybe_blocking<T>(
        &self,
        op: &'static str,
        cmd: Cmd,
        block: Option<Duration>,
    ) -> Result<T>
    where
        T: FromRedisValue + Send + 'static,
    {
        match block {
            Some(block) => self.query_blocking(op, cmd, block).await,
            None => self.query(op, &cmd).await,
        }
    }
}

/// `BLOCK 0` means "forever" to Redis, so a zero block becomes no block
fn effective_block(block: Option<Duration>) -> Option<Duration> {
    block.filter(|b| !b.is_zero())
}

fn block_millis(block: Duration) -> u64 {
    (block.as_millis() as u64).max(1)
}

#[async_trait]
impl CounterStore for RedisStoreProvider {
    async fn increment(&self, key: &str) -> Result<u64> {
        self.query("INCR", redis::cmd("INCR").arg(key)).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let set: u64 = self
            .query(
                "PEXPIRE",
                redis::cmd("PEXPIRE").arg(key).arg(ttl.as_millis() as u64),
            )
            .await?;
        Ok(set == 1)
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        let millis: i64 = self.query("PTTL", redis::cmd("PTTL").arg(key)).await?;
        Ok(match millis {
            -2 => KeyTtl::Missing,
            ms if ms < 0 => KeyTtl::Persistent,
            ms => KeyTtl::Expires(Duration::from_millis(ms as u64)),
        })
    }
}

#[async_trait]
impl KeyValueStore for RedisStoreProvider {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.query("GET", redis::cmd("GET").arg(key)).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let millis = (ttl.as_millis() as u64).max(1);
        self.query(
            "SET",
            redis::cmd("SET").arg(key).arg(value).arg("PX").arg(millis),
        )
        .await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let deleted: u64 = self.query("DEL", redis::cmd("DEL").arg(key)).await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl PubSubStore for RedisStoreProvider {
    async fn publish(&self, channel: &str, payload: &str) -> Result<u64> {
        self.query(
            "PUBLISH",
            redis::cmd("PUBLISH").arg(channel).arg(payload),
        )
        .await
    }

    async fn subscribe(&self, channel: &str) -> Result<MessageStream> {
        let mut pubsub = self
            .bounded("SUBSCRIBE", self.client.get_async_pubsub())
            .await?;
        self.bounded("SUBSCRIBE", pubsub.subscribe(channel)).await?;
        debug!(channel, server = %self.address, "Subscribed");

        let channel = channel.to_string();
        let stream = pubsub.into_on_message().filter_map(move |msg| {
            let channel = channel.clone();
            async move {
                match msg.get_payload::<String>() {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        warn!(channel = %channel, error = %e, "Dropping undecodable message");
                        None
                    }
                }
            }
        });
        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl LogStore for RedisStoreProvider {
    async fn append(&self, log: &str, attributes: &WorkItemAttributes) -> Result<WorkItemId> {
        self.xadd(log, attributes, None).await
    }

    async fn append_capped(
        &self,
        log: &str,
        attributes: &WorkItemAttributes,
        max_len: usize,
    ) -> Result<WorkItemId> {
        self.xadd(log, attributes, Some(max_len)).await
    }

    async fn latest_id(&self, log: &str) -> Result<Option<WorkItemId>> {
        let reply: StreamRangeReply = self
            .query(
                "XREVRANGE",
                redis::cmd("XREVRANGE")
                    .arg(log)
                    .arg("+")
                    .arg("-")
                    .arg("COUNT")
                    .arg(1),
            )
            .await?;
        reply.ids.first().map(|entry| entry.id.parse()).transpose()
    }

    async fn read(
        &self,
        log: &str,
        position: StreamPosition,
        count: usize,
        block: Option<Duration>,
    ) -> Result<Vec<WorkItem>> {
        let block = effective_block(block);
        let mut cmd = redis::cmd("XREAD");
        cmd.arg("COUNT").arg(count);
        if let Some(block) = block {
            cmd.arg("BLOCK").arg(block_millis(block));
        }
        cmd.arg("STREAMS").arg(log).arg(position.as_wire());

        let reply: Option<StreamReadReply> = self.query_maybe_blocking("XREAD", cmd, block).await?;
        read_reply_items(reply)
    }

    async fn create_group(&self, log: &str, group: &str, start: StreamPosition) -> Result<bool> {
        let mut conn = self.connection().await?;
        let created = tokio::time::timeout(
            self.timeout,
            redis::cmd("XGROUP")
                .arg("CREATE")
                .arg(log)
                .arg(group)
                .arg(start.as_wire())
                .arg("MKSTREAM")
                .query_async::<()>(&mut conn),
        )
        .await;

        match created {
            Ok(Ok(())) => Ok(true),
            Ok(Err(e)) if e.code() == Some("BUSYGROUP") => Ok(false),
            Ok(Err(e)) => Err(redis_error("XGROUP CREATE", e)),
            Err(_) => Err(Error::store_unavailable(format!(
                "Redis XGROUP CREATE timed out after {:?}",
                self.timeout
            ))),
        }
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
        // History reads return immediately regardless of BLOCK
        let block = match mode {
            GroupReadMode::New => effective_block(block),
            GroupReadMode::PendingAfter(_) => None,
        };
        let mut cmd = redis::cmd("XREADGROUP");
        cmd.arg("GROUP").arg(group).arg(consumer);
        cmd.arg("COUNT").arg(count);
        if let Some(block) = block {
            cmd.arg("BLOCK").arg(block_millis(block));
        }
        cmd.arg("STREAMS").arg(log).arg(mode.as_wire());

        let reply: Option<StreamReadReply> =
            self.query_maybe_blocking("XREADGROUP", cmd, block).await?;
        read_reply_items(reply)
    }

    async fn acknowledge(&self, log: &str, group: &str, id: WorkItemId) -> Result<bool> {
        let acked: u64 = self
            .query(
                "XACK",
                redis::cmd("XACK").arg(log).arg(group).arg(id.to_string()),
            )
            .await?;
        Ok(acked > 0)
    }

    async fn pending(&self, log: &str, group: &str, count: usize) -> Result<Vec<PendingEntry>> {
        let rows: Vec<(String, String, u64, u64)> = self
            .query(
                "XPENDING",
                redis::cmd("XPENDING")
                    .arg(log)
                    .arg(group)
                    .arg("-")
                    .arg("+")
                    .arg(count),
            )
            .await?;

        rows.into_iter()
            .map(|(id, consumer, idle_ms, delivery_count)| {
                Ok(PendingEntry {
                    id: id.parse()?,
                    consumer,
                    idle: Duration::from_millis(idle_ms),
                    delivery_count,
                })
            })
            .collect()
    }

    async fn claim_idle(
        &self,
        log: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> Result<Vec<WorkItem>> {
        let reply: StreamAutoClaimReply = self
            .query(
                "XAUTOCLAIM",
                redis::cmd("XAUTOCLAIM")
                    .arg(log)
                    .arg(group)
                    .arg(consumer)
                    .arg(min_idle.as_millis() as u64)
                    .arg(WorkItemId::MIN.to_string())
                    .arg("COUNT")
                    .arg(count),
            )
            .await?;
        reply.claimed.iter().map(to_work_item).collect()
    }
}

#[async_trait]
impl StoreProvider for RedisStoreProvider {
    async fn ping(&self) -> Result<()> {
        let _: String = self.query("PING", &redis::cmd("PING")).await?;
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisStoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStoreProvider")
            .field("server", &self.address)
            .field("timeout", &self.timeout)
            .field("connected", &self.manager.initialized())
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use gatehouse_application::ports::registry::{
    STORE_PROVIDERS, StoreProviderConfig, StoreProviderEntry,
};

/// Factory function for creating Redis store provider instances
///
/// A URL wins over host/port. Without either the configuration is rejected.
fn redis_store_factory(
    config: &StoreProviderConfig,
) -> std::result::Result<Arc<dyn StoreProvider>, String> {
    let provider = match (&config.url, &config.host) {
        (Some(url), _) => RedisStoreProvider::new(url),
        (None, Some(host)) => {
            let port = config.port.unwrap_or(REDIS_DEFAULT_PORT);
            match &config.password {
                Some(password) => RedisStoreProvider::with_credentials(
                    host,
                    port,
                    config.username.as_deref(),
                    password,
                ),
                None => RedisStoreProvider::with_host_port(host, port),
            }
        }
        (None, None) => {
            return Err("Redis store requires either store.url or store.host".to_string());
        }
    }
    .map_err(|e| format!("Failed to create Redis provider: {e}"))?;

    let provider = match config.connect_timeout {
        Some(timeout) => provider.with_timeout(timeout),
        None => provider,
    };
    Ok(Arc::new(provider))
}

#[linkme::distributed_slice(STORE_PROVIDERS)]
static REDIS_STORE: StoreProviderEntry = StoreProviderEntry {
    name: "redis",
    description: "Redis store shared by every instance",
    factory: redis_store_factory,
};
