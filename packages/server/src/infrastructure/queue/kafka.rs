//! Kafka consumer group adapter.
//!
//! Configured for manual offset management: nothing is committed until the
//! ingestion loop has applied a record to the store.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    ClientConfig, Message, Offset, TopicPartitionList,
    consumer::{CommitMode, Consumer, StreamConsumer},
};

use crate::domain::{MessageQueue, QueueError, QueueRecord};

const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

pub struct KafkaQueue {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaQueue {
    /// Create a consumer subscribed to `topic` as member of `group_id`.
    ///
    /// # Configuration
    /// - `enable.auto.commit=false`: offsets are committed by the ingestion loop
    /// - `auto.offset.reset=earliest`: a new group starts from the beginning
    pub fn new(brokers: &str, topic: &str, group_id: &str) -> Result<Self, QueueError> {
        tracing::info!(
            "Initializing Kafka consumer (brokers: {}, topic: {}, group: {})",
            brokers,
            topic,
            group_id
        );

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "30000")
            .set("heartbeat.interval.ms", "3000")
            .create()
            .map_err(|e| QueueError::Unreachable(e.to_string()))?;

        consumer
            .subscribe(&[topic])
            .map_err(|e| QueueError::Unreachable(e.to_string()))?;

        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl MessageQueue for KafkaQueue {
    async fn check_connection(&self) -> Result<(), QueueError> {
        // librdkafka metadata requests are synchronous
        tokio::task::block_in_place(|| {
            self.consumer
                .fetch_metadata(Some(&self.topic), METADATA_TIMEOUT)
                .map(|_| ())
                .map_err(|e| QueueError::Unreachable(e.to_string()))
        })
    }

    async fn fetch(&self) -> Result<QueueRecord, QueueError> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(|e| QueueError::Fetch(e.to_string()))?;

        Ok(QueueRecord {
            key: message
                .key()
                .map(|key| String::from_utf8_lossy(key).into_owned()),
            payload: message.payload().unwrap_or_default().to_vec(),
            partition: message.partition(),
            offset: message.offset(),
        })
    }

    async fn commit(&self, record: &QueueRecord) -> Result<(), QueueError> {
        let mut offsets = TopicPartitionList::new();
        offsets
            .add_partition_offset(&self.topic, record.partition, Offset::Offset(record.offset + 1))
            .map_err(|e| QueueError::Commit(e.to_string()))?;
        self.consumer
            .commit(&offsets, CommitMode::Sync)
            .map_err(|e| QueueError::Commit(e.to_string()))
    }
}
