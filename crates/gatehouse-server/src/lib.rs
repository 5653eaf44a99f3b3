//! # Gatehouse Server
//!
//! Thin HTTP boundary over the application use cases.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /resource-feed` | Admission-checked, cached resource feed |
//! | `POST /work-items` | Admission-checked work item submission |
//! | `GET /health` | Store reachability |

pub mod constants;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod init;
pub mod routes;

pub use error::ApiError;
pub use init::run;
pub use routes::build_rocket;
