//! Work Queue Producer

use gatehouse_domain::constants::{ATTR_QUANTITY, ATTR_RESOURCE_ID};
use gatehouse_domain::error::{Error, Result};
use gatehouse_domain::ports::LogStore;
use gatehouse_domain::value_objects::{WorkItemAttributes, WorkItemId};
use std::sync::Arc;
use tracing::info;

/// Build the attributes of a resource work item
///
/// Both fields are required and must be non-empty after trimming.
pub fn work_item_attributes(
    resource_id: Option<&str>,
    quantity: Option<&str>,
) -> Result<WorkItemAttributes> {
    let required = |name: &str, value: Option<&str>| -> Result<String> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(Error::malformed_input(format!("Missing field '{name}'"))),
        }
    };

    Ok(WorkItemAttributes::from([
        (
            ATTR_RESOURCE_ID.to_string(),
            required(ATTR_RESOURCE_ID, resource_id)?,
        ),
        (ATTR_QUANTITY.to_string(), required(ATTR_QUANTITY, quantity)?),
    ]))
}

/// Appends work items to a log
#[derive(Clone)]
pub struct WorkQueueProducer {
    log: Arc<dyn LogStore>,
    max_len: Option<usize>,
}

impl WorkQueueProducer {
    /// Create a producer over the given log store
    pub fn new(log: Arc<dyn LogStore>) -> Self {
        Self { log, max_len: None }
    }

    /// Trim the log to about `max_len` records on every append
    pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }

    /// Append one item, returning its log-assigned id
    pub async fn enqueue(
        &self,
        log_name: &str,
        attributes: WorkItemAttributes,
    ) -> Result<WorkItemId> {
        if attributes.is_empty() {
            return Err(Error::malformed_input("Work item has no attributes"));
        }
        let id = match self.max_len {
            Some(max_len) => self.log.append_capped(log_name, &attributes, max_len).await?,
            None => self.log.append(log_name, &attributes).await?,
        };
        info!(log = log_name, id = %id, "Work item enqueued");
        Ok(id)
    }
}

impl std::fmt::Debug for WorkQueueProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkQueueProducer")
            .field("max_len", &self.max_len)
            .finish_non_exhaustive()
    }
}
