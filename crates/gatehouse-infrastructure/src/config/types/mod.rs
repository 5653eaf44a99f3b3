//! Configuration types module

pub mod admission;
pub mod app;
pub mod cache;
pub mod logging;
pub mod origin;
pub mod queue;
pub mod server;
pub mod store;

// Re-export main types
pub use app::*;
