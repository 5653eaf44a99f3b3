//! Application Layer - Gatehouse
//!
//! Use cases built on top of the store ports declared in `gatehouse-domain`.
//! Nothing here knows which backend is in use; concrete providers register
//! themselves into the registries in [`ports::registry`].
//!
//! ## Use Cases
//!
//! - Fixed-window admission control
//! - Read-through caching with explicit invalidation
//! - Invalidation listener and publisher over pub/sub
//! - Durable work queue producer and consumers
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `gatehouse-domain`: errors, value objects and store port traits
//! - Pure Rust libraries for async, serialization, etc.

pub mod domain_services;
pub mod ports;
pub mod use_cases;

pub use domain_services::*;
pub use ports::*;
pub use use_cases::*;
