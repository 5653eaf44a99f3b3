//! # Gatehouse
//!
//! A small request-serving core in front of an expensive origin:
//!
//! - **Admission control**: fixed-window counter per caller identity
//! - **Read-through cache**: cache-aside feed with live invalidation
//! - **Work queue**: durable ordered log with at-least-once group consumers
//!
//! ## Example
//!
//! ```ignore
//! use gatehouse::infrastructure::config::AppConfig;
//!
//! let mut config = AppConfig::default();
//! config.store.provider = "memory".to_string();
//! let ctx = gatehouse::infrastructure::init_app(config).await?;
//! let feed = ctx.feed().feed().await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Error taxonomy, value objects and port traits
//! - `application` - Use cases and provider registries
//! - `providers` - Redis and in-memory stores, origins
//! - `infrastructure` - Configuration, logging, bootstrap and workers
//! - `server` - HTTP routes and server lifecycle

/// Domain layer - core types and port traits
pub mod domain {
    pub use gatehouse_domain::*;
}

/// Application layer - use cases and registries
pub mod application {
    pub use gatehouse_application::*;
}

/// Provider implementations
pub mod providers {
    pub use gatehouse_providers::*;
}

/// Infrastructure layer - configuration, logging and bootstrap
pub mod infrastructure {
    pub use gatehouse_infrastructure::*;
}

/// Server layer - HTTP boundary
pub mod server {
    pub use gatehouse_server::*;
}

pub use gatehouse_domain::{Error, Result};
pub use gatehouse_server::run;
