//! Bootstrap wiring tests against the in-memory store

use gatehouse_application::domain_services::WorkItemProcessor;
use gatehouse_application::use_cases::{ConsumerMode, work_item_attributes};
use gatehouse_domain::Error;
use gatehouse_domain::ports::{KeyValueStore, LogStore};
use gatehouse_domain::value_objects::{ClientIdentity, GroupReadMode, StreamPosition};
use gatehouse_infrastructure::config::{AppConfig, GroupStart, ProcessorKind, QueueMode};
use gatehouse_infrastructure::di::provider_resolvers::store_registry_config;
use gatehouse_infrastructure::{AppContext, WorkerSupervisor, init_app};
use gatehouse_providers::origin::StaticFeedOrigin;
use gatehouse_providers::store::InMemoryStoreProvider;
use std::sync::Arc;
use std::time::Duration;

fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.store.provider = "memory".to_string();
    config.origin.latency_ms = 0;
    config
}

fn context_with(config: AppConfig) -> (AppContext, Arc<InMemoryStoreProvider>) {
    let store = InMemoryStoreProvider::new_shared();
    let origin = Arc::new(StaticFeedOrigin::with_latency(Duration::ZERO));
    (
        AppContext::from_providers(config, store.clone(), origin),
        store,
    )
}

#[tokio::test]
async fn test_init_app_resolves_registered_providers() {
    let ctx = init_app(memory_config()).await.unwrap();
    assert_eq!(ctx.store().provider_name(), "memory");
    assert_eq!(ctx.origin().provider_name(), "static");
    assert_eq!(ctx.work_log(), "work-items");
}

#[tokio::test]
async fn test_init_app_rejects_unknown_provider() {
    let mut config = memory_config();
    config.store.provider = "etcd".to_string();
    let err = init_app(config).await.unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("Unknown store provider 'etcd'"));
}

#[test]
fn test_store_registry_config_mapping() {
    let mut config = AppConfig::default();
    config.store.host = Some("redis.internal".to_string());
    config.store.port = Some(14032);
    config.store.username = Some("default".to_string());
    config.store.password = Some("secret".to_string());

    let registry = store_registry_config(&config.store);
    assert_eq!(registry.provider, "redis");
    assert_eq!(registry.host.as_deref(), Some("redis.internal"));
    assert_eq!(registry.port, Some(14032));
    assert_eq!(registry.username.as_deref(), Some("default"));
    assert_eq!(registry.password.as_deref(), Some("secret"));
    assert_eq!(registry.connect_timeout, Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn test_admission_follows_configured_limit() {
    let mut config = memory_config();
    config.admission.limit = 2;
    let (ctx, _store) = context_with(config);
    let identity = ClientIdentity::new("10.1.1.1");

    for _ in 0..2 {
        let decision = ctx
            .admission()
            .admit(&identity, ctx.window_policy())
            .await
            .unwrap();
        assert!(decision.is_allowed());
    }
    let decision = ctx
        .admission()
        .admit(&identity, ctx.window_policy())
        .await
        .unwrap();
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn test_feed_uses_configured_key() {
    let mut config = memory_config();
    config.cache.feed_key = "catalog".to_string();
    let (ctx, store) = context_with(config);

    assert!(!ctx.feed().feed().await.unwrap().is_hit());
    assert!(store.get("catalog").await.unwrap().is_some());
    assert!(ctx.feed().feed().await.unwrap().is_hit());
}

#[test]
fn test_consumer_settings_from_config() {
    let mut config = memory_config();
    config.queue.group = "billing".to_string();
    config.queue.group_start = GroupStart::Latest;
    config.queue.consumer = Some("node-1".to_string());
    config.queue.batch_size = 4;
    config.queue.block_ms = 200;
    let (ctx, _store) = context_with(config);

    let settings = ctx.consumer_settings();
    assert_eq!(
        settings.mode,
        ConsumerMode::Group {
            group: "billing".to_string(),
            consumer: "node-1".to_string(),
            start: StreamPosition::Latest,
        }
    );
    assert_eq!(settings.batch_size, 4);
    assert_eq!(settings.block, Duration::from_millis(200));

    let mut tail = memory_config();
    tail.queue.mode = QueueMode::Tail;
    let (ctx, _store) = context_with(tail);
    assert_eq!(ctx.consumer_settings().mode, ConsumerMode::Tail);
}

#[tokio::test(start_paused = true)]
async fn test_restart_with_default_consumer_name_recovers_pending() {
    let config = memory_config();
    assert!(config.queue.consumer.is_none());
    let store = InMemoryStoreProvider::new_shared();
    let origin = Arc::new(StaticFeedOrigin::with_latency(Duration::ZERO));

    // First process reads an item and exits before acknowledging it
    let first = AppContext::from_providers(config.clone(), store.clone(), origin.clone());
    let ConsumerMode::Group { consumer, .. } = first.consumer_settings().mode else {
        panic!("group mode is the default");
    };
    let group = config.queue.group.clone();
    store
        .create_group(first.work_log(), &group, StreamPosition::Start)
        .await
        .unwrap();
    let attrs = work_item_attributes(Some("42"), Some("3")).unwrap();
    first.producer().enqueue(first.work_log(), attrs).await.unwrap();
    let taken = store
        .read_group(first.work_log(), &group, &consumer, GroupReadMode::New, 10, None)
        .await
        .unwrap();
    assert_eq!(taken.len(), 1);
    drop(first);

    let second = AppContext::from_providers(config.clone(), store.clone(), origin);
    assert_eq!(second.consumer_settings().mode, ConsumerMode::Group {
        group: group.clone(),
        consumer,
        start: StreamPosition::Start,
    });
    let supervisor = WorkerSupervisor::new();
    second.start_workers(&supervisor).unwrap();

    // Recovered from its own history, long before another consumer could claim it
    let mut recovered = false;
    for _ in 0..100 {
        if store
            .pending(second.work_log(), &group, 10)
            .await
            .unwrap()
            .is_empty()
        {
            recovered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(recovered, "restarted consumer should acknowledge its pending item");
    assert!(Duration::from_secs(1) < Duration::from_millis(config.queue.claim_min_idle_ms));

    supervisor.shutdown(Duration::from_secs(10)).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_producer_caps_log_from_config() {
    let mut config = memory_config();
    config.queue.max_len = Some(2);
    let (ctx, store) = context_with(config);

    for id in ["1", "2", "3"] {
        let attrs = work_item_attributes(Some(id), Some("1")).unwrap();
        ctx.producer().enqueue(ctx.work_log(), attrs).await.unwrap();
    }
    let kept = store
        .read(ctx.work_log(), StreamPosition::Start, 10, None)
        .await
        .unwrap();
    assert_eq!(kept.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_feed_refresh_worker_evicts_cached_feed() {
    let mut config = memory_config();
    config.queue.processor = ProcessorKind::FeedRefresh;
    config.queue.block_ms = 100;
    config.invalidation.retry_backoff_ms = 50;
    let (ctx, store) = context_with(config);
    assert_eq!(ctx.processor().name(), "feed-refresh");

    ctx.feed().feed().await.unwrap();
    assert!(store.get("products_feed").await.unwrap().is_some());

    let supervisor = WorkerSupervisor::new();
    assert_eq!(ctx.start_workers(&supervisor).unwrap(), 2);
    for _ in 0..100 {
        if store.subscriber_count("cache-invalidation") == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let attrs = work_item_attributes(Some("42"), Some("3")).unwrap();
    ctx.producer().enqueue(ctx.work_log(), attrs).await.unwrap();

    let mut evicted = false;
    for _ in 0..200 {
        if store.get("products_feed").await.unwrap().is_none() {
            evicted = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(evicted, "feed entry should be invalidated by the worker");

    supervisor.shutdown(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn test_disabled_workers_are_not_started() {
    let mut config = memory_config();
    config.invalidation.enabled = false;
    config.queue.enabled = false;
    let (ctx, _store) = context_with(config);

    let supervisor = WorkerSupervisor::new();
    assert_eq!(ctx.start_workers(&supervisor).unwrap(), 0);
    assert_eq!(supervisor.worker_count(), 0);
}
