//! Provider Resolvers
//!
//! ```text
//! AppConfig section → registry config → linkme registry → Arc<dyn Provider>
//! ```

use crate::config::{OriginConfig, StoreConfig};
use crate::error_ext::registry_error;
use gatehouse_application::ports::registry::{
    OriginProviderConfig, StoreProviderConfig, list_origin_providers, list_store_providers,
    resolve_origin_provider, resolve_store_provider,
};
use gatehouse_domain::error::Result;
use gatehouse_domain::ports::{OriginProvider, StoreProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Registry config for the store section
pub fn store_registry_config(config: &StoreConfig) -> StoreProviderConfig {
    let mut registry = StoreProviderConfig::new(&config.provider)
        .with_connect_timeout(Duration::from_secs(config.timeout_secs));
    if let Some(url) = &config.url {
        registry = registry.with_url(url);
    }
    if let Some(host) = &config.host {
        registry.host = Some(host.clone());
    }
    registry.port = config.port;
    if let Some(password) = &config.password {
        registry = registry.with_credentials(config.username.clone(), password);
    } else {
        registry.username = config.username.clone();
    }
    registry
}

/// Registry config for the origin section
pub fn origin_registry_config(config: &OriginConfig) -> OriginProviderConfig {
    let mut registry = OriginProviderConfig::new(&config.provider)
        .with_latency(Duration::from_millis(config.latency_ms))
        .with_timeout(Duration::from_secs(config.timeout_secs));
    if let Some(url) = &config.url {
        registry = registry.with_url(url);
    }
    registry
}

/// Create the configured store provider
pub fn resolve_store(config: &StoreConfig) -> Result<Arc<dyn StoreProvider>> {
    debug!(available = ?list_store_providers(), "Store providers registered");
    let store = resolve_store_provider(&store_registry_config(config))
        .map_err(|e| registry_error("store", e))?;
    info!(provider = store.provider_name(), "Store provider resolved");
    Ok(store)
}

/// Create the configured origin provider
pub fn resolve_origin(config: &OriginConfig) -> Result<Arc<dyn OriginProvider>> {
    debug!(available = ?list_origin_providers(), "Origin providers registered");
    let origin = resolve_origin_provider(&origin_registry_config(config))
        .map_err(|e| registry_error("origin", e))?;
    info!(provider = origin.provider_name(), "Origin provider resolved");
    Ok(origin)
}
