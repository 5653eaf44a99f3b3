//! Main application configuration

use serde::{Deserialize, Serialize};

pub use super::admission::AdmissionConfig;
pub use super::cache::{CacheConfig, InvalidationConfig};
pub use super::logging::LoggingConfig;
pub use super::origin::OriginConfig;
pub use super::queue::{
    GroupStart, ProcessorKind, QueueConfig, QueueMode, default_consumer_name,
};
pub use super::server::ServerConfig;
pub use super::store::StoreConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Backing store configuration
    pub store: StoreConfig,
    /// Admission control configuration
    pub admission: AdmissionConfig,
    /// Read-through cache configuration
    pub cache: CacheConfig,
    /// Invalidation listener configuration
    pub invalidation: InvalidationConfig,
    /// Work queue configuration
    pub queue: QueueConfig,
    /// Origin provider configuration
    pub origin: OriginConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}
