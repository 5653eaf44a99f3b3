//! Read-through cache value objects

use serde::{Deserialize, Serialize};

/// Whether a value was served from the cache or loaded from the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheOutcome {
    /// Served from a present cache entry
    Hit,
    /// Loaded from the origin and written back
    Miss,
}

/// Value returned by a read-through lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub outcome: CacheOutcome,
}

impl<T> CacheLookup<T> {
    /// Value served from cache
    pub fn hit(value: T) -> Self {
        Self {
            value,
            outcome: CacheOutcome::Hit,
        }
    }

    /// Value loaded from the origin
    pub fn miss(value: T) -> Self {
        Self {
            value,
            outcome: CacheOutcome::Miss,
        }
    }

    /// Whether this lookup was a cache hit
    pub fn is_hit(&self) -> bool {
        self.outcome == CacheOutcome::Hit
    }
}
