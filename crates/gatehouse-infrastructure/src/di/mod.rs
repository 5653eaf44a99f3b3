//! Composition root
//!
//! Resolves providers from the linkme registries and wires the use cases.

pub mod bootstrap;
pub mod provider_resolvers;

pub use bootstrap::{AppContext, init_app};
pub use provider_resolvers::{resolve_origin, resolve_store};
