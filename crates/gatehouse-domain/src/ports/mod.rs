//! Domain Port Interfaces
//!
//! Boundary contracts the core depends on. Providers implement them in
//! `gatehouse-providers`; use cases in `gatehouse-application` consume them
//! through `Arc<dyn ...>` handles injected by the composition root.
//!
//! ## Organization
//!
//! - **providers/** - store primitives (counters, key-value, pub/sub, log)
//! - **origin** - the expensive upstream data source

/// Upstream data source port
pub mod origin;
/// Store primitive ports
pub mod providers;

pub use origin::OriginProvider;
pub use providers::{
    CounterStore, KeyTtl, KeyValueStore, LogStore, MessageStream, PubSubStore, StoreProvider,
};
