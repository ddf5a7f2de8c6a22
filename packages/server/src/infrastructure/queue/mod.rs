//! Message queue implementations
//!
//! - `inmemory`: channel-backed queue for local runs and tests
//! - `kafka`: Kafka consumer group (requires the `kafka` feature)

pub mod inmemory;
#[cfg(feature = "kafka")]
pub mod kafka;

pub use inmemory::{InMemoryProducer, InMemoryQueue};
#[cfg(feature = "kafka")]
pub use kafka::KafkaQueue;
