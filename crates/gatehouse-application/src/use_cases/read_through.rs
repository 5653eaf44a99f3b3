//! Read-Through Cache Use Case
//!
//! Cache-aside lookups over a key-value store. A present entry is a HIT; an
//! absent one triggers the loader and writes the serialized result back with a
//! TTL in a single set-with-expiry call. Loader failures are never cached.

use dashmap::DashMap;
use gatehouse_domain::error::{Error, Result};
use gatehouse_domain::ports::KeyValueStore;
use gatehouse_domain::value_objects::CacheLookup;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

type LoadGates = DashMap<String, Arc<Mutex<()>>>;

/// Cache-aside reader over a key-value store
#[derive(Clone)]
pub struct ReadThroughCache {
    store: Arc<dyn KeyValueStore>,
    fail_open: bool,
    in_flight: Option<Arc<LoadGates>>,
}

impl ReadThroughCache {
    /// Create a cache over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            fail_open: false,
            in_flight: None,
        }
    }

    /// Treat store failures as misses instead of propagating them
    pub fn with_fail_open(mut self, fail_open: bool) -> Self {
        self.fail_open = fail_open;
        self
    }

    /// Coalesce concurrent misses for the same key within this process
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Arc::new(DashMap::new()));
        self
    }

    /// Return the cached value for `key` or load, store and return it
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> Result<CacheLookup<T>>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        if let Some(value) = self.read_cached(key).await? {
            info!(key, "Cache HIT");
            return Ok(CacheLookup::hit(value));
        }

        let Some(gates) = &self.in_flight else {
            return self.load_and_store(key, ttl, loader).await;
        };

        let gate = gates.entry(key.to_string()).or_default().clone();
        let result = {
            let _guard = gate.lock().await;
            // Another caller may have filled the entry while we waited
            match self.read_cached(key).await {
                Ok(Some(value)) => {
                    info!(key, "Cache HIT");
                    Ok(CacheLookup::hit(value))
                }
                Ok(None) => self.load_and_store(key, ttl, loader).await,
                Err(e) => Err(e),
            }
        };
        // One reference held here and one by the map
        gates.remove_if(key, |_, g| Arc::strong_count(g) <= 2);
        result
    }

    /// Remove an entry so the next lookup misses
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        self.store.delete(key).await
    }

    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw,
            Err(e) if self.fail_open && e.is_transient() => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let Some(raw) = raw else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    async fn load_and_store<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> Result<CacheLookup<T>>
    where
        T: Serialize + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        info!(key, "Cache MISS");
        let value = loader().await.map_err(|e| match e {
            Error::Origin { .. } => e,
            other => Error::origin_with_source(format!("Loading '{key}' failed"), other),
        })?;

        let payload = serde_json::to_string(&value)?;
        match self.store.set_with_ttl(key, &payload, ttl).await {
            Ok(()) => {}
            Err(e) if self.fail_open && e.is_transient() => {
                warn!(key, error = %e, "Cache write failed, returning loaded value");
            }
            Err(e) => return Err(e),
        }
        Ok(CacheLookup::miss(value))
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("fail_open", &self.fail_open)
            .field("single_flight", &self.in_flight.is_some())
            .finish()
    }
}
