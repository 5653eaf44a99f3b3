//! Port Interfaces
//!
//! Store and origin traits live in `gatehouse-domain`; this module re-exports
//! them next to the provider registries used to resolve implementations.

/// Provider registry for dynamic provider discovery
pub mod registry;

pub use gatehouse_domain::ports::{
    CounterStore, KeyTtl, KeyValueStore, LogStore, MessageStream, OriginProvider, PubSubStore,
    StoreProvider,
};
pub use registry::{
    ORIGIN_PROVIDERS, OriginProviderConfig, OriginProviderEntry, STORE_PROVIDERS,
    StoreProviderConfig, StoreProviderEntry, list_origin_providers, list_store_providers,
    resolve_origin_provider, resolve_store_provider,
};
