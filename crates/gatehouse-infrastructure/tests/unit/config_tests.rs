//! Configuration loading and validation tests

use gatehouse_domain::Error;
use gatehouse_domain::value_objects::{FailurePolicy, StreamPosition};
use gatehouse_infrastructure::config::{
    AppConfig, ConfigLoader, GroupStart, ProcessorKind, QueueMode, default_consumer_name,
    validate_app_config,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn loader(file: &NamedTempFile, prefix: &str) -> ConfigLoader {
    ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix(prefix)
}

#[test]
fn test_defaults_are_valid() {
    let config = AppConfig::default();
    validate_app_config(&config).unwrap();

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.store.provider, "redis");
    assert_eq!(config.admission.limit, 10);
    assert_eq!(config.admission.window_secs, 60);
    assert_eq!(config.admission.key_prefix, "rate_limit");
    assert_eq!(config.admission.on_store_failure, FailurePolicy::Closed);
    assert_eq!(config.cache.ttl_secs, 60);
    assert_eq!(config.cache.feed_key, "products_feed");
    assert!(!config.cache.single_flight);
    assert_eq!(config.invalidation.channel, "cache-invalidation");
    assert_eq!(config.queue.mode, QueueMode::Group);
    assert_eq!(config.queue.block_ms, 5000);
    assert_eq!(config.origin.provider, "static");
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
[server]
port = 8081
workers = false

[store]
provider = "memory"

[admission]
limit = 3
on_store_failure = "open"

[queue]
mode = "tail"
processor = "feed-refresh"
group_start = "latest"
consumer = "worker-a"
"#,
    );

    let config = loader(&file, "GATEHOUSE_TEST_FILE").load().unwrap();
    assert_eq!(config.server.port, 8081);
    assert!(!config.server.workers);
    assert_eq!(config.store.provider, "memory");
    assert_eq!(config.admission.limit, 3);
    assert_eq!(config.admission.on_store_failure, FailurePolicy::Open);
    assert_eq!(config.queue.mode, QueueMode::Tail);
    assert_eq!(config.queue.processor, ProcessorKind::FeedRefresh);
    assert_eq!(
        StreamPosition::from(config.queue.group_start),
        StreamPosition::Latest
    );
    assert_eq!(config.queue.consumer_name(), "worker-a");
    // Untouched sections keep their defaults
    assert_eq!(config.cache.ttl_secs, 60);
    assert_eq!(config.admission.window_secs, 60);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = ConfigLoader::new()
        .with_config_path("/nonexistent/gatehouse.toml")
        .load();
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config("[store]\nprovider = \"memory\"\n\n[cache]\nttl_secs = 30\n");
    // SAFETY: the prefix is unique to this test
    unsafe {
        std::env::set_var("GATEHOUSE_TEST_ENV__CACHE__TTL_SECS", "5");
        std::env::set_var("GATEHOUSE_TEST_ENV__QUEUE__BLOCK_MS", "250");
    }

    let config = loader(&file, "GATEHOUSE_TEST_ENV").load().unwrap();
    assert_eq!(config.cache.ttl_secs, 5);
    assert_eq!(config.queue.block_ms, 250);
    assert_eq!(config.store.provider, "memory");
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let file = write_config("[admission]\nlimit = 0\n");
    let result = loader(&file, "GATEHOUSE_TEST_ZERO").load();
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_validation_rules() {
    let reject = |mutate: fn(&mut AppConfig)| {
        let mut config = AppConfig::default();
        mutate(&mut config);
        validate_app_config(&config).unwrap_err()
    };

    reject(|c| c.admission.window_secs = 0);
    reject(|c| c.cache.ttl_secs = 0);
    reject(|c| c.queue.batch_size = 0);
    reject(|c| c.queue.log_name = String::new());
    reject(|c| c.invalidation.channel = " ".to_string());
    reject(|c| c.logging.level = "loud".to_string());
    reject(|c| c.origin.provider = "http".to_string());
    reject(|c| c.queue.block_ms = 0);
    reject(|c| c.queue.retry_backoff_ms = 0);
    reject(|c| c.queue.max_len = Some(0));
    reject(|c| c.invalidation.retry_backoff_ms = 0);
    reject(|c| c.queue.block_ms = c.server.shutdown_timeout_secs * 1000);

    let err = reject(|c| {
        c.store.host = None;
        c.store.url = None;
    });
    assert!(err.to_string().contains("store.url or store.host"));
}

#[test]
fn test_memory_store_needs_no_address() {
    let mut config = AppConfig::default();
    config.store.provider = "memory".to_string();
    config.store.host = None;
    validate_app_config(&config).unwrap();
}

#[test]
fn test_tail_mode_ignores_group_name() {
    let mut config = AppConfig::default();
    config.queue.mode = QueueMode::Tail;
    config.queue.group = String::new();
    validate_app_config(&config).unwrap();
}

#[test]
fn test_default_consumer_name_is_stable_across_restarts() {
    let first = AppConfig::default().queue.consumer_name();
    let second = AppConfig::default().queue.consumer_name();
    assert_eq!(first, second);
    assert!(!first.trim().is_empty());
    assert!(!first.ends_with(&format!("-{}", std::process::id())));
    assert_eq!(GroupStart::default(), GroupStart::Start);
}

#[test]
fn test_blank_consumer_name_falls_back_to_default() {
    let mut config = AppConfig::default();
    config.queue.consumer = Some("  ".to_string());
    assert_eq!(config.queue.consumer_name(), default_consumer_name());
}

#[test]
fn test_default_keys_follow_feed_key() {
    let file = write_config("[cache]\nfeed_key = \"catalog\"\n");
    let config = loader(&file, "GATEHOUSE_TEST_FEEDKEY").load().unwrap();
    assert!(config.invalidation.default_keys.is_empty());
    assert_eq!(
        config.invalidation.effective_default_keys(&config.cache),
        vec!["catalog".to_string()]
    );

    let file = write_config(
        "[cache]\nfeed_key = \"catalog\"\n\n[invalidation]\ndefault_keys = [\"a\", \"b\"]\n",
    );
    let config = loader(&file, "GATEHOUSE_TEST_KEYS").load().unwrap();
    assert_eq!(
        config.invalidation.effective_default_keys(&config.cache),
        vec!["a".to_string(), "b".to_string()]
    );
}

#[test]
fn test_load_reports_source_file() {
    let file = write_config("[queue]\nmax_len = 10000\n");
    let (config, source) = loader(&file, "GATEHOUSE_TEST_SOURCE")
        .load_with_source()
        .unwrap();
    assert_eq!(source.as_deref(), Some(file.path()));
    assert_eq!(config.queue.max_len, Some(10_000));
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.toml");

    let mut config = AppConfig::default();
    config.store.provider = "memory".to_string();
    config.admission.limit = 7;
    ConfigLoader::new().save_to_file(&config, &path).unwrap();

    let loaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("GATEHOUSE_TEST_SAVE")
        .load()
        .unwrap();
    assert_eq!(loaded.admission.limit, 7);
    assert_eq!(loaded.store.provider, "memory");
}
