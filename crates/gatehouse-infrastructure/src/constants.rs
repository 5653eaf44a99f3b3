//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Core behaviour defaults are defined in `gatehouse_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "gatehouse.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "gatehouse";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "GATEHOUSE";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// HTTP SERVER CONSTANTS
// ============================================================================

/// Default HTTP server port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default server host
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Seconds background workers get to finish after a shutdown request
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// STORE & ORIGIN CONSTANTS
// ============================================================================

/// Default store provider
pub const DEFAULT_STORE_PROVIDER: &str = "redis";

/// Default store host
pub const DEFAULT_STORE_HOST: &str = "127.0.0.1";

/// Default store port
pub const DEFAULT_STORE_PORT: u16 = 6379;

/// Timeout for a single short store operation in seconds
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;

/// Default origin provider
pub const DEFAULT_ORIGIN_PROVIDER: &str = "static";

/// Simulated latency of the static origin in milliseconds
pub const DEFAULT_ORIGIN_LATENCY_MS: u64 = 2000;

/// Request timeout of remote origins in seconds
pub const DEFAULT_ORIGIN_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "GATEHOUSE_LOG";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "gatehouse";

// ============================================================================
// WORKER CONSTANTS
// ============================================================================

/// Consumer name used when the host name cannot be read
pub const FALLBACK_CONSUMER_NAME: &str = "gatehouse-consumer";

/// Supervisor name of the invalidation listener task
pub const WORKER_INVALIDATION: &str = "invalidation-listener";

/// Supervisor name of the work queue consumer task
pub const WORKER_CONSUMER: &str = "work-queue-consumer";
