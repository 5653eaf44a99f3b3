//! Origin Provider Registry

use std::sync::Arc;
use std::time::Duration;

use crate::ports::OriginProvider;

/// Configuration for origin provider creation
#[derive(Debug, Clone, Default)]
pub struct OriginProviderConfig {
    /// Provider name (e.g., "static", "http")
    pub provider: String,
    /// Base URL for remote origins
    pub url: Option<String>,
    /// Simulated load latency for in-process origins
    pub latency: Option<Duration>,
    /// Request timeout for remote origins
    pub timeout: Option<Duration>,
}

impl OriginProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the simulated latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Registry entry for origin providers
pub struct OriginProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&OriginProviderConfig) -> Result<Arc<dyn OriginProvider>, String>,
}

#[linkme::distributed_slice]
pub static ORIGIN_PROVIDERS: [OriginProviderEntry] = [..];

/// Resolve origin provider by name from registry
pub fn resolve_origin_provider(
    config: &OriginProviderConfig,
) -> Result<Arc<dyn OriginProvider>, String> {
    let provider_name = &config.provider;

    for entry in ORIGIN_PROVIDERS {
        if entry.name == provider_name {
            return (entry.factory)(config);
        }
    }

    let available: Vec<&str> = ORIGIN_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown origin provider '{}'. Available providers: {:?}",
        provider_name, available
    ))
}

/// List all registered origin providers as `(name, description)` pairs
pub fn list_origin_providers() -> Vec<(&'static str, &'static str)> {
    ORIGIN_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
