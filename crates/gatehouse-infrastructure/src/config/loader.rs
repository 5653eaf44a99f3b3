//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use crate::config::{AppConfig, QueueMode};
use crate::constants::*;
use crate::error_ext::ErrorContext;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use gatehouse_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, or discovered)
    /// 3. Environment variables with prefix (e.g., `GATEHOUSE__STORE__HOST`)
    pub fn load(&self) -> Result<AppConfig> {
        self.load_with_source().map(|(config, _)| config)
    }

    /// Load configuration and report the file it was read from, if any
    ///
    /// Nothing is logged here since this normally runs before the log
    /// subscriber exists; see [`crate::logging::log_config_loaded`].
    pub fn load_with_source(&self) -> Result<(AppConfig, Option<PathBuf>)> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let source = match &self.config_path {
            Some(config_path) if !config_path.exists() => {
                return Err(Error::configuration(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            Some(config_path) => Some(config_path.clone()),
            None => Self::find_default_config_path(),
        };
        if let Some(path) = &source {
            figment = figment.merge(Toml::file(path));
        }

        // Double underscore separates nested keys (GATEHOUSE__QUEUE__BLOCK_MS)
        figment = figment.merge(
            Env::prefixed(&format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR))
                .split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok((app_config, source))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join(DEFAULT_CONFIG_FILENAME));
        }
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(
                config_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            );
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server_config(config)?;
    validate_store_config(config)?;
    validate_admission_config(config)?;
    validate_cache_config(config)?;
    validate_queue_config(config)?;
    validate_origin_config(config)?;
    crate::logging::parse_log_level(&config.logging.level)?;
    Ok(())
}

fn invalid(message: impl Into<String>) -> Result<()> {
    Err(Error::configuration(message))
}

fn validate_server_config(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        return invalid("Server port cannot be 0");
    }
    if config.server.host.trim().is_empty() {
        return invalid("Server host cannot be empty");
    }
    Ok(())
}

fn validate_store_config(config: &AppConfig) -> Result<()> {
    let store = &config.store;
    if store.provider.trim().is_empty() {
        return invalid("Store provider cannot be empty");
    }
    if store.provider == "redis" && !store.has_address() {
        return invalid("Redis store requires either store.url or store.host");
    }
    if store.timeout_secs == 0 {
        return invalid("Store timeout cannot be 0");
    }
    Ok(())
}

fn validate_admission_config(config: &AppConfig) -> Result<()> {
    let admission = &config.admission;
    if admission.window_secs == 0 {
        return invalid("Admission window cannot be 0");
    }
    if admission.limit == 0 {
        return invalid("Admission limit cannot be 0");
    }
    if admission.key_prefix.trim().is_empty() {
        return invalid("Admission key prefix cannot be empty");
    }
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    if config.cache.ttl_secs == 0 {
        return invalid("Cache TTL cannot be 0");
    }
    if config.cache.feed_key.trim().is_empty() {
        return invalid("Cache feed key cannot be empty");
    }
    if config.invalidation.channel.trim().is_empty() {
        return invalid("Invalidation channel cannot be empty");
    }
    if config.invalidation.retry_backoff_ms == 0 {
        return invalid("Invalidation retry backoff cannot be 0");
    }
    Ok(())
}

fn validate_queue_config(config: &AppConfig) -> Result<()> {
    let queue = &config.queue;
    if queue.log_name.trim().is_empty() {
        return invalid("Queue log name cannot be empty");
    }
    if queue.mode == QueueMode::Group && queue.group.trim().is_empty() {
        return invalid("Queue group name cannot be empty in group mode");
    }
    if queue.batch_size == 0 {
        return invalid("Queue batch size cannot be 0");
    }
    if queue.claim_interval == 0 {
        return invalid("Queue claim interval cannot be 0");
    }
    // A zero block turns the read loop into a busy poll
    if queue.block_ms == 0 {
        return invalid("Queue block time cannot be 0");
    }
    if queue.retry_backoff_ms == 0 {
        return invalid("Queue retry backoff cannot be 0");
    }
    if queue.max_len == Some(0) {
        return invalid("Queue max length cannot be 0");
    }
    // Shutdown lets the current read return before the worker exits
    let shutdown_ms = config.server.shutdown_timeout_secs.saturating_mul(1000);
    if queue.enabled && queue.block_ms >= shutdown_ms {
        return invalid("Queue block time must be shorter than the shutdown timeout");
    }
    Ok(())
}

fn validate_origin_config(config: &AppConfig) -> Result<()> {
    let origin = &config.origin;
    if origin.provider.trim().is_empty() {
        return invalid("Origin provider cannot be empty");
    }
    if origin.provider == "http" && origin.url.as_deref().is_none_or(|u| u.trim().is_empty()) {
        return invalid("HTTP origin requires origin.url");
    }
    Ok(())
}
