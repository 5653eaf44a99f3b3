//! Shared fixtures for route tests

use async_trait::async_trait;
use gatehouse_domain::Error;
use gatehouse_domain::Result;
use gatehouse_domain::ports::OriginProvider;
use gatehouse_infrastructure::AppContext;
use gatehouse_infrastructure::config::AppConfig;
use gatehouse_providers::origin::StaticFeedOrigin;
use gatehouse_providers::store::InMemoryStoreProvider;
use gatehouse_server::build_rocket;
use rocket::local::asynchronous::Client;
use std::sync::Arc;
use std::time::Duration;

/// Origin that always fails
#[derive(Debug)]
pub struct BrokenOrigin;

#[async_trait]
impl OriginProvider for BrokenOrigin {
    async fn load(&self, resource: &str) -> Result<serde_json::Value> {
        Err(Error::origin(format!("upstream down while loading {resource}")))
    }

    fn provider_name(&self) -> &str {
        "broken"
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.store.provider = "memory".to_string();
    config
}

pub async fn client_with(
    config: AppConfig,
    origin: Arc<dyn OriginProvider>,
) -> (Client, Arc<InMemoryStoreProvider>) {
    let store = InMemoryStoreProvider::new_shared();
    let ctx = AppContext::from_providers(config, store.clone(), origin);
    let client = Client::tracked(build_rocket(Arc::new(ctx)))
        .await
        .expect("valid rocket instance");
    (client, store)
}

pub async fn client(config: AppConfig) -> (Client, Arc<InMemoryStoreProvider>) {
    client_with(
        config,
        Arc::new(StaticFeedOrigin::with_latency(Duration::ZERO)),
    )
    .await
}
