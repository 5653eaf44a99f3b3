//! Work Queue Use Cases
//!
//! Producers append items to a durable log. Consumers run in one of two
//! modes:
//!
//! - **Group**: a named consumer group with at-least-once delivery. Items are
//!   acknowledged after successful processing; unacknowledged items stay
//!   pending and are claimed again once idle.
//! - **Tail**: a plain tail of the log from "now". Items appended while the
//!   consumer is down, or lost in a crash, are skipped.

pub mod consumer;
pub mod processors;
pub mod producer;

pub use consumer::{ConsumerMode, ConsumerSettings, ConsumerStats, WorkQueueConsumer};
pub use processors::{FeedRefreshProcessor, LoggingProcessor};
pub use producer::{WorkQueueProducer, work_item_attributes};
