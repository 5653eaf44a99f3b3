//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and domain layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration with TOML and environment overrides |
//! | [`constants`] | Centralized configuration constants |
//! | [`di`] | Provider resolution and application bootstrap |
//! | [`error_ext`] | Error context extension trait |
//! | [`lifecycle`] | Background worker supervision |
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod lifecycle;
pub mod logging;

// Re-export commonly used types
pub use di::{AppContext, init_app};
pub use error_ext::ErrorContext;
pub use lifecycle::WorkerSupervisor;
