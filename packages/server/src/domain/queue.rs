//! Message queue abstraction consumed by the ingestion loop.
//!
//! The transport delivers at least once. Offsets are committed explicitly
//! by the consumer after a record has been applied to the store.

use async_trait::async_trait;

use super::error::QueueError;

/// One record pulled from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    /// Discriminator (`"message"` or `"update_status"`); absent when the
    /// producer sent no key.
    pub key: Option<String>,
    /// JSON payload
    pub payload: Vec<u8>,
    pub partition: i32,
    pub offset: i64,
}

impl QueueRecord {
    pub fn new(key: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            key: Some(key.into()),
            payload: payload.into(),
            partition: 0,
            offset: 0,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Probe the broker once before consumption starts.
    async fn check_connection(&self) -> Result<(), QueueError>;

    /// Wait for the next record. Blocks the caller until one arrives.
    async fn fetch(&self) -> Result<QueueRecord, QueueError>;

    /// Mark `record` (and everything before it on its partition) as consumed.
    async fn commit(&self, record: &QueueRecord) -> Result<(), QueueError>;
}
