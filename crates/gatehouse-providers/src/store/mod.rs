//! Store Provider Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`InMemoryStoreProvider`] | Local | Single-process store for tests and development |
//! | [`RedisStoreProvider`] | Distributed | Redis-backed, shared by every instance |

pub mod memory;
#[cfg(feature = "store-redis")]
pub mod redis;

pub use memory::InMemoryStoreProvider;
#[cfg(feature = "store-redis")]
pub use redis::RedisStoreProvider;
