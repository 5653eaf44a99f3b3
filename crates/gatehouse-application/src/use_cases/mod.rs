//! Application Use Cases
//!
//! | Use case | Description |
//! |----------|-------------|
//! | [`AdmissionController`] | Fixed-window request admission per identity |
//! | [`ReadThroughCache`] | Cache-aside reads with TTL and optional single-flight |
//! | [`ResourceFeedService`] | Feed lookups through the cache and the origin |
//! | [`InvalidationListener`] | Evicts keys named on the invalidation channel |
//! | [`InvalidationPublisher`] | Publishes invalidation notices |
//! | [`WorkQueueProducer`] | Appends work items to a log |
//! | [`WorkQueueConsumer`] | Group (at-least-once) and tail (best-effort) consumers |

pub mod admission;
pub mod invalidation;
pub mod read_through;
pub mod resource_feed;
pub mod work_queue;

pub use admission::AdmissionController;
pub use invalidation::{InvalidationListener, InvalidationPublisher};
pub use read_through::ReadThroughCache;
pub use resource_feed::ResourceFeedService;
pub use work_queue::{
    ConsumerMode, ConsumerSettings, ConsumerStats, FeedRefreshProcessor, LoggingProcessor,
    WorkQueueConsumer, WorkQueueProducer, work_item_attributes,
};
