//! Origin configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Origin provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Registered provider name ("static", "http")
    pub provider: String,
    /// Base URL for the http origin
    pub url: Option<String>,
    /// Simulated latency of the static origin in milliseconds
    pub latency_ms: u64,
    /// Request timeout of the http origin in seconds
    pub timeout_secs: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_ORIGIN_PROVIDER.to_string(),
            url: None,
            latency_ms: DEFAULT_ORIGIN_LATENCY_MS,
            timeout_secs: DEFAULT_ORIGIN_TIMEOUT_SECS,
        }
    }
}
