//! HTTP boundary constants

/// Body message of a rejected request
pub const MSG_TOO_MANY_REQUESTS: &str = "too many requests";

/// Body message of an origin or internal failure
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";

/// Body message when the store cannot be reached
pub const MSG_STORE_UNAVAILABLE: &str = "Service temporarily unavailable";

/// Header carrying the retry hint of a rejected request
pub const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Header reporting whether the feed came from the cache
pub const CACHE_STATUS_HEADER: &str = "X-Cache";

/// Health status when the store answers
pub const HEALTH_OK: &str = "ok";

/// Health status when the store does not answer
pub const HEALTH_DEGRADED: &str = "degraded";
