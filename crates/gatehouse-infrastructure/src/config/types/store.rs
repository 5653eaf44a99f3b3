//! Store configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Backing store configuration
///
/// Either `url` or `host`/`port` (plus optional credentials) addresses the
/// store; `url` wins when both are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Registered provider name ("redis", "memory")
    pub provider: String,
    /// Full connection URL
    pub url: Option<String>,
    /// Store host
    pub host: Option<String>,
    /// Store port
    pub port: Option<u16>,
    /// Username for authenticated stores
    pub username: Option<String>,
    /// Password for authenticated stores
    pub password: Option<String>,
    /// Timeout of one short store operation in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_STORE_PROVIDER.to_string(),
            url: None,
            host: Some(DEFAULT_STORE_HOST.to_string()),
            port: Some(DEFAULT_STORE_PORT),
            username: None,
            password: None,
            timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// Whether any address is configured
    pub fn has_address(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
            || self.host.as_deref().is_some_and(|h| !h.trim().is_empty())
    }
}
