//! Store Provider Ports
//!
//! The primitives the core needs from its external key-value store.
//!
//! | Port | Primitives |
//! |------|------------|
//! | [`CounterStore`] | atomic increment, set expiry, TTL query |
//! | [`KeyValueStore`] | get, set-with-ttl, delete |
//! | [`PubSubStore`] | publish, subscribe |
//! | [`LogStore`] | append, tailing read, consumer groups |
//! | [`StoreProvider`] | all of the above plus health |

/// Atomic counter port
pub mod counter;
/// Key-value port
pub mod key_value;
/// Append-only log port
pub mod log;
/// Publish/subscribe port
pub mod pubsub;
/// Combined store port
pub mod store;

pub use counter::{CounterStore, KeyTtl};
pub use key_value::KeyValueStore;
pub use log::LogStore;
pub use pubsub::{MessageStream, PubSubStore};
pub use store::StoreProvider;
