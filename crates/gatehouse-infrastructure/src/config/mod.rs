//! Configuration
//!
//! Typed sections merged by figment from defaults, a TOML file and
//! `GATEHOUSE__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, validate_app_config};
pub use types::*;
