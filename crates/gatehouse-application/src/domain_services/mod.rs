//! Domain Services
//!
//! Interfaces for services the use cases call back into.
//!
//! | Service | Description |
//! |---------|-------------|
//! | [`WorkItemProcessor`] | Handles one work item delivered by a consumer |

/// Work item processing interface
pub mod processing;

pub use processing::WorkItemProcessor;
