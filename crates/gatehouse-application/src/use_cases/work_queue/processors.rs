//! Shipped work item processors

use crate::domain_services::WorkItemProcessor;
use crate::use_cases::invalidation::InvalidationPublisher;
use async_trait::async_trait;
use gatehouse_domain::constants::{ATTR_QUANTITY, ATTR_RESOURCE_ID};
use gatehouse_domain::error::Result;
use gatehouse_domain::value_objects::WorkItem;
use tracing::info;

/// Logs every item it receives
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProcessor;

#[async_trait]
impl WorkItemProcessor for LoggingProcessor {
    async fn process(&self, item: &WorkItem) -> Result<()> {
        info!(
            id = %item.id,
            resource_id = item.attribute(ATTR_RESOURCE_ID).unwrap_or_default(),
            quantity = item.attribute(ATTR_QUANTITY).unwrap_or_default(),
            "Processing work item"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "logging"
    }
}

/// Invalidates cached feed entries once a change has been processed
///
/// Publishing the same notice twice is harmless, so redelivery is safe.
#[derive(Debug, Clone)]
pub struct FeedRefreshProcessor {
    publisher: InvalidationPublisher,
    keys: Vec<String>,
}

impl FeedRefreshProcessor {
    /// Create a processor invalidating `keys` for every item
    pub fn new(publisher: InvalidationPublisher, keys: Vec<String>) -> Self {
        Self { publisher, keys }
    }
}

#[async_trait]
impl WorkItemProcessor for FeedRefreshProcessor {
    async fn process(&self, item: &WorkItem) -> Result<()> {
        info!(
            id = %item.id,
            resource_id = item.attribute(ATTR_RESOURCE_ID).unwrap_or_default(),
            quantity = item.attribute(ATTR_QUANTITY).unwrap_or_default(),
            "Processing work item"
        );
        let receivers = self
            .publisher
            .publish_invalidation(self.keys.iter().cloned())
            .await?;
        info!(id = %item.id, receivers, "Feed invalidation published");
        Ok(())
    }

    fn name(&self) -> &str {
        "feed-refresh"
    }
}
