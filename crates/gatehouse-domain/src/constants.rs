//! Domain layer constants
//!
//! Defaults that describe the behaviour of the core itself. Infrastructure
//! specific values (ports, file names, env prefixes) live in
//! `gatehouse_infrastructure::constants`.

// ============================================================================
// ADMISSION CONTROL
// ============================================================================

/// Default fixed-window length in seconds
pub const ADMISSION_WINDOW_SECS: u64 = 60;

/// Default number of requests admitted per identity and window
pub const ADMISSION_LIMIT: u64 = 10;

/// Key prefix for window counters
pub const ADMISSION_KEY_PREFIX: &str = "rate_limit";

/// Identity used when the caller address is unknown
pub const FALLBACK_IDENTITY: &str = "127.0.0.1";

// ============================================================================
// READ-THROUGH CACHE
// ============================================================================

/// Default cache entry time-to-live in seconds
pub const CACHE_TTL_SECS: u64 = 60;

/// Cache key of the resource feed
pub const RESOURCE_FEED_KEY: &str = "products_feed";

// ============================================================================
// INVALIDATION & WORK QUEUE
// ============================================================================

/// Channel carrying cache invalidation notices
pub const INVALIDATION_CHANNEL: &str = "cache-invalidation";

/// Log receiving work items
pub const WORK_LOG_NAME: &str = "work-items";

/// Consumer group used by durable workers
pub const WORK_GROUP_NAME: &str = "workers";

/// Items read per claim cycle
pub const WORK_BATCH_SIZE: usize = 1;

/// Backoff applied by background loops after a transient failure (ms)
pub const RETRY_BACKOFF_MS: u64 = 1000;

/// Upper bound of a single blocking log read (ms)
pub const LOG_BLOCK_MS: u64 = 5000;

/// Idle time after which another consumer's pending entry may be claimed (ms)
pub const CLAIM_MIN_IDLE_MS: u64 = 30_000;

/// Claim cycles between two sweeps of other consumers' pending entries
pub const CLAIM_INTERVAL_CYCLES: u32 = 10;

/// Work item attribute naming the affected resource
pub const ATTR_RESOURCE_ID: &str = "resourceId";

/// Work item attribute carrying the quantity
pub const ATTR_QUANTITY: &str = "quantity";
