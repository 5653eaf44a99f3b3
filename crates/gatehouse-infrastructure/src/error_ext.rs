//! Error extension utilities
//!
//! Converts foreign errors raised while bootstrapping (file IO, TOML,
//! figment, subscriber install, worker joins) into domain errors.

use gatehouse_domain::error::{Error, Result};
use std::fmt;

/// Attach a message to a foreign error
///
/// ```ignore
/// let raw = std::fs::read_to_string(&path).config_context("Failed to read config file")?;
/// ```
pub trait ErrorContext<T> {
    /// Wrap the error as [`Error::Infrastructure`]
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Wrap the error as [`Error::Configuration`]
    fn config_context<C: fmt::Display>(self, context: C) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::infrastructure_with_source(format!("{context}: {err}"), err))
    }

    fn config_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::configuration_with_source(format!("{context}: {err}"), err))
    }
}

/// Convert a registry lookup failure into a configuration error
pub fn registry_error(kind: &str, message: String) -> Error {
    Error::configuration(format!("Failed to create {kind} provider: {message}"))
}
