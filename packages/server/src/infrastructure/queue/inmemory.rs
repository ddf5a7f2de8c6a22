//! Channel-backed queue.
//!
//! Producers and the consumer share one ordered channel, i.e. a single
//! partition. The stream ends once every producer handle is dropped.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{MessageQueue, QueueError, QueueRecord};

/// Publishing side of an in-memory queue.
#[derive(Clone)]
pub struct InMemoryProducer {
    sender: mpsc::UnboundedSender<QueueRecord>,
    next_offset: Arc<AtomicI64>,
}

impl InMemoryProducer {
    /// Append a record and return its offset.
    pub fn publish(
        &self,
        key: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Result<i64, QueueError> {
        let mut record = QueueRecord::new(key, payload);
        record.offset = self.next_offset.fetch_add(1, Ordering::SeqCst);
        let offset = record.offset;
        self.sender.send(record).map_err(|_| QueueError::Closed)?;
        Ok(offset)
    }

    /// Append a record without a discriminator key.
    pub fn publish_unkeyed(&self, payload: impl Into<Vec<u8>>) -> Result<i64, QueueError> {
        let offset = self.next_offset.fetch_add(1, Ordering::SeqCst);
        let record = QueueRecord {
            key: None,
            payload: payload.into(),
            partition: 0,
            offset,
        };
        self.sender.send(record).map_err(|_| QueueError::Closed)?;
        Ok(offset)
    }
}

/// Consuming side of an in-memory queue.
pub struct InMemoryQueue {
    receiver: Mutex<mpsc::UnboundedReceiver<QueueRecord>>,
    /// Offset of the next record to consume after the last commit
    committed: Mutex<Option<i64>>,
    reachable: bool,
}

impl InMemoryQueue {
    /// Create a connected producer/consumer pair.
    pub fn channel() -> (InMemoryProducer, InMemoryQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let producer = InMemoryProducer {
            sender,
            next_offset: Arc::new(AtomicI64::new(0)),
        };
        let queue = InMemoryQueue {
            receiver: Mutex::new(receiver),
            committed: Mutex::new(None),
            reachable: true,
        };
        (producer, queue)
    }

    /// A queue whose broker never answers the startup probe.
    pub fn unreachable() -> Self {
        let (_, mut queue) = Self::channel();
        queue.reachable = false;
        queue
    }

    /// Commit watermark: the offset consumption resumes from after a restart.
    pub async fn committed_offset(&self) -> Option<i64> {
        *self.committed.lock().await
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn check_connection(&self) -> Result<(), QueueError> {
        if self.reachable {
            Ok(())
        } else {
            Err(QueueError::Unreachable("in-memory broker is offline".to_string()))
        }
    }

    async fn fetch(&self) -> Result<QueueRecord, QueueError> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await.ok_or(QueueError::Closed)
    }

    async fn commit(&self, record: &QueueRecord) -> Result<(), QueueError> {
        let mut committed = self.committed.lock().await;
        let next = record.offset + 1;
        // the watermark only moves forward
        if committed.is_none_or(|current| next > current) {
            *committed = Some(next);
        }
        Ok(())
    }
}
