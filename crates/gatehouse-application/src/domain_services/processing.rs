//! Work Item Processing Interface

use async_trait::async_trait;
use gatehouse_domain::error::Result;
use gatehouse_domain::value_objects::WorkItem;

/// Handles one delivered work item
///
/// Delivery is at-least-once in group mode, so implementations must tolerate
/// seeing the same item more than once. Returning an error leaves the item
/// pending.
#[async_trait]
pub trait WorkItemProcessor: Send + Sync {
    /// Process a single item
    async fn process(&self, item: &WorkItem) -> Result<()>;

    /// Name used in log lines
    fn name(&self) -> &str;
}
