//! Provider Constants
//!
//! Constants specific to provider implementations. Domain defaults live in
//! `gatehouse-domain`.

// ============================================================================
// REDIS STORE CONSTANTS
// ============================================================================

/// Default Redis port
pub const REDIS_DEFAULT_PORT: u16 = 6379;

/// Username used when only a password is configured
pub const REDIS_DEFAULT_USERNAME: &str = "default";

/// Timeout for establishing a connection and for short commands
pub const REDIS_OPERATION_TIMEOUT_SECS: u64 = 5;

/// Extra socket read time granted to blocking reads beyond their BLOCK window
pub const REDIS_BLOCK_READ_MARGIN_MS: u64 = 1000;

// ============================================================================
// IN-MEMORY STORE CONSTANTS
// ============================================================================

/// Buffered messages per pub/sub channel before slow subscribers lag
pub const MEMORY_CHANNEL_CAPACITY: usize = 1024;

// ============================================================================
// ORIGIN CONSTANTS
// ============================================================================

/// Simulated latency of the static feed origin
pub const STATIC_ORIGIN_LATENCY_MS: u64 = 2000;

/// Request timeout of the HTTP origin
pub const HTTP_ORIGIN_TIMEOUT_SECS: u64 = 30;
