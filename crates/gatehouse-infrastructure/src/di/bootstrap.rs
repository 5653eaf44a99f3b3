//! Application bootstrap
//!
//! Builds the [`AppContext`] from configuration: providers come from the
//! linkme registries (the binary must link `gatehouse-providers`), use cases
//! are wired around them, and background workers are started on demand.
//!
//! ```text
//! AppConfig → resolvers → StoreProvider / OriginProvider → use cases
//!                                                       ↘ workers (supervisor)
//! ```

use crate::config::{AppConfig, ProcessorKind, QueueMode};
use crate::constants::{WORKER_CONSUMER, WORKER_INVALIDATION};
use crate::di::provider_resolvers::{resolve_origin, resolve_store};
use crate::lifecycle::WorkerSupervisor;
use gatehouse_application::domain_services::WorkItemProcessor;
use gatehouse_application::use_cases::{
    AdmissionController, ConsumerMode, ConsumerSettings, FeedRefreshProcessor,
    InvalidationListener, InvalidationPublisher, LoggingProcessor, ReadThroughCache,
    ResourceFeedService, WorkQueueConsumer, WorkQueueProducer,
};
use gatehouse_domain::error::Result;
use gatehouse_domain::ports::{OriginProvider, StoreProvider};
use gatehouse_domain::value_objects::WindowPolicy;
use std::sync::Arc;
use tracing::{info, warn};

/// Application context: providers plus the use cases built on them
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,
    store: Arc<dyn StoreProvider>,
    origin: Arc<dyn OriginProvider>,
    admission: AdmissionController,
    feed: ResourceFeedService,
    producer: WorkQueueProducer,
    publisher: InvalidationPublisher,
}

impl AppContext {
    /// Wire the use cases around already created providers
    pub fn from_providers(
        config: AppConfig,
        store: Arc<dyn StoreProvider>,
        origin: Arc<dyn OriginProvider>,
    ) -> Self {
        let admission = AdmissionController::new(store.clone())
            .with_key_prefix(&config.admission.key_prefix)
            .with_failure_policy(config.admission.on_store_failure)
            .with_enabled(config.admission.enabled);

        let cache = ReadThroughCache::new(store.clone())
            .with_fail_open(config.cache.fail_open)
            .with_single_flight(config.cache.single_flight);
        let feed = ResourceFeedService::new(cache, origin.clone())
            .with_key(&config.cache.feed_key)
            .with_ttl(config.cache.ttl());

        let producer =
            WorkQueueProducer::new(store.clone()).with_max_len(config.queue.max_len);
        let publisher = InvalidationPublisher::new(store.clone(), &config.invalidation.channel);

        Self {
            config: Arc::new(config),
            store,
            origin,
            admission,
            feed,
            producer,
            publisher,
        }
    }

    /// Store provider shared by every role
    pub fn store(&self) -> Arc<dyn StoreProvider> {
        self.store.clone()
    }

    /// Origin provider behind the feed
    pub fn origin(&self) -> Arc<dyn OriginProvider> {
        self.origin.clone()
    }

    /// Admission controller for the request path
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// Window policy applied to every request
    pub fn window_policy(&self) -> WindowPolicy {
        self.config.admission.policy()
    }

    /// Cached resource feed
    pub fn feed(&self) -> &ResourceFeedService {
        &self.feed
    }

    /// Work queue producer
    pub fn producer(&self) -> &WorkQueueProducer {
        &self.producer
    }

    /// Log receiving work items
    pub fn work_log(&self) -> &str {
        &self.config.queue.log_name
    }

    /// Invalidation publisher on the configured channel
    pub fn publisher(&self) -> &InvalidationPublisher {
        &self.publisher
    }

    /// Invalidation listener built from configuration
    pub fn invalidation_listener(&self) -> InvalidationListener {
        let settings = &self.config.invalidation;
        InvalidationListener::new(self.store.clone(), self.store.clone())
            .with_channel(&settings.channel)
            .with_default_keys(settings.effective_default_keys(&self.config.cache))
            .with_retry_backoff(settings.retry_backoff())
    }

    /// Consumer settings built from configuration
    pub fn consumer_settings(&self) -> ConsumerSettings {
        let queue = &self.config.queue;
        let settings = match queue.mode {
            QueueMode::Group => ConsumerSettings::group(queue.consumer_name()),
            QueueMode::Tail => ConsumerSettings::tail(),
        };
        let mut settings = settings
            .with_log_name(&queue.log_name)
            .with_batch_size(queue.batch_size)
            .with_block(queue.block())
            .with_retry_backoff(queue.retry_backoff())
            .with_claim_min_idle(queue.claim_min_idle())
            .with_claim_interval(queue.claim_interval);
        if let ConsumerMode::Group { group, start, .. } = &mut settings.mode {
            *group = queue.group.clone();
            *start = queue.group_start.into();
        }
        settings
    }

    /// Work item processor selected by configuration
    pub fn processor(&self) -> Arc<dyn WorkItemProcessor> {
        match self.config.queue.processor {
            ProcessorKind::Logging => Arc::new(LoggingProcessor),
            ProcessorKind::FeedRefresh => Arc::new(FeedRefreshProcessor::new(
                self.publisher.clone(),
                vec![self.config.cache.feed_key.clone()],
            )),
        }
    }

    /// Work queue consumer built from configuration
    pub fn work_queue_consumer(&self) -> WorkQueueConsumer {
        WorkQueueConsumer::new(self.store.clone(), self.processor(), self.consumer_settings())
    }

    /// Start the enabled background workers, returning how many were spawned
    pub fn start_workers(&self, supervisor: &WorkerSupervisor) -> Result<usize> {
        let mut started = 0;

        if self.config.invalidation.enabled {
            let listener = self.invalidation_listener();
            supervisor.spawn(WORKER_INVALIDATION, |cancel| async move {
                listener.run(cancel).await;
            })?;
            started += 1;
        }

        if self.config.queue.enabled {
            let consumer = self.work_queue_consumer();
            supervisor.spawn(WORKER_CONSUMER, |cancel| async move {
                consumer.run(cancel).await;
            })?;
            started += 1;
        }

        Ok(started)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("origin", &self.origin)
            .field("admission", &self.admission)
            .finish_non_exhaustive()
    }
}

/// Initialize the application context from configuration
///
/// An unreachable store is logged but does not fail startup; requests then
/// answer 503 until it comes back.
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    info!("Initializing application context");

    let store = resolve_store(&config.store)?;
    let origin = resolve_origin(&config.origin)?;

    if let Err(e) = store.ping().await {
        warn!(provider = store.provider_name(), error = %e, "Store not reachable at startup");
    }

    Ok(AppContext::from_providers(config, store, origin))
}
