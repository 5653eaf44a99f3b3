//! # Gatehouse Domain
//!
//! Core types and boundary contracts for the Gatehouse request-serving core.
//! Nothing in this crate talks to a store, an origin or the network; it only
//! defines what the outer layers must provide.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`constants`] | Domain defaults (window, TTL, channel and log names) |
//! | [`value_objects`] | Identities, admission decisions, work items, notices |
//! | [`ports`] | Store and origin port traits |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{
    CounterStore, KeyTtl, KeyValueStore, LogStore, MessageStream, OriginProvider, PubSubStore,
    StoreProvider,
};
pub use value_objects::{
    AdmissionDecision, CacheLookup, CacheOutcome, ClientIdentity, FailurePolicy, GroupReadMode,
    InvalidationNotice, PendingEntry, StreamPosition, WindowPolicy, WorkItem, WorkItemAttributes,
    WorkItemId,
};
