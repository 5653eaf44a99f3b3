//! # Gatehouse - Provider Implementations
//!
//! User-selectable implementations of the ports defined in
//! `gatehouse-domain`. Every provider registers itself into the linkme
//! registries of `gatehouse-application`, so the composition root only needs
//! to link this crate and name a provider in configuration.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Store | `StoreProvider` | Redis, InMemory |
//! | Origin | `OriginProvider` | Static feed, HTTP |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! gatehouse-providers = { version = "0.1", default-features = false, features = ["store-redis"] }
//! ```

pub use gatehouse_domain::error::{Error, Result};
pub use gatehouse_domain::ports::{OriginProvider, StoreProvider};

/// Provider-specific constants
pub mod constants;

/// Store provider implementations
///
/// Implements the combined `StoreProvider` port.
pub mod store;

/// Origin provider implementations
///
/// Implements `OriginProvider` for upstream data sources.
pub mod origin;
