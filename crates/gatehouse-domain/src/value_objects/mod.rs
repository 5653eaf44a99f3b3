//! Domain Value Objects
//!
//! Immutable values exchanged between the core components and the store.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`ClientIdentity`] | Opaque caller identity used for admission |
//! | [`WindowPolicy`] | Fixed-window length and limit |
//! | [`AdmissionDecision`] | Allowed or rejected with retry hint |
//! | [`CacheLookup`] | Value plus hit/miss outcome |
//! | [`WorkItem`] | Immutable log record with ordered id |
//! | [`InvalidationNotice`] | Keys to evict from the cache |

/// Admission control value objects
pub mod admission;
/// Read-through cache value objects
pub mod cache;
/// Cache invalidation notices
pub mod invalidation;
/// Work queue records and cursors
pub mod work_item;

pub use admission::{AdmissionDecision, ClientIdentity, FailurePolicy, WindowPolicy};
pub use cache::{CacheLookup, CacheOutcome};
pub use invalidation::InvalidationNotice;
pub use work_item::{
    GroupReadMode, PendingEntry, StreamPosition, WorkItem, WorkItemAttributes, WorkItemId,
};
