//! Provider Registry System
//!
//! Uses the `linkme` crate for compile-time registration of providers that
//! are discovered and instantiated at runtime.
//!
//! ```text
//! 1. Provider defines:  #[linkme::distributed_slice(STORE_PROVIDERS)]
//!                       static ENTRY: StoreProviderEntry = ...
//! 2. Registry declares: #[linkme::distributed_slice]
//!                       pub static STORE_PROVIDERS: [StoreProviderEntry] = [..]
//! 3. Config selects:    "provider = redis" → RedisStoreProvider
//! ```
//!
//! ## Registering a Provider (in gatehouse-providers)
//!
//! ```ignore
//! use gatehouse_application::ports::registry::{StoreProviderEntry, STORE_PROVIDERS};
//!
//! #[linkme::distributed_slice(STORE_PROVIDERS)]
//! static MEMORY_STORE: StoreProviderEntry = StoreProviderEntry {
//!     name: "memory",
//!     description: "In-process store",
//!     factory: |_| Ok(Arc::new(InMemoryStoreProvider::new())),
//! };
//! ```

pub mod origin;
pub mod store;

pub use origin::{
    ORIGIN_PROVIDERS, OriginProviderConfig, OriginProviderEntry, list_origin_providers,
    resolve_origin_provider,
};
pub use store::{
    STORE_PROVIDERS, StoreProviderConfig, StoreProviderEntry, list_store_providers,
    resolve_store_provider,
};
