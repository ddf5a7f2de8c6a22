//! The ingestion loop.
//!
//! States: `Connecting → Reading → Processing → Committing → Reading`.
//! Records are applied strictly one at a time. A record that cannot be
//! decoded or persisted is logged and skipped without committing it; a failed
//! commit is logged and the loop keeps reading. Nothing is retried in place.

use std::{future::Future, sync::Arc};

use obrolan_shared::time::Clock;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::{MessageQueue, QueueError, QueueRecord, Timestamp};

use super::record::{IngestCommand, RecordDispatcher};

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerExit {
    /// The startup probe failed; no record was read.
    Unreachable(String),
    /// Every producer went away.
    StreamClosed,
    /// Reading from the stream failed.
    FetchFailed(String),
    /// The shutdown signal fired.
    Shutdown,
}

/// Per-run record counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Applied to the store
    pub processed: u64,
    /// Unknown kind or undecodable payload
    pub skipped: u64,
    /// Rejected by the store or by validation
    pub failed: u64,
    pub commit_failures: u64,
}

enum State {
    Connecting,
    Reading,
    Processing(QueueRecord),
    Committing(QueueRecord),
    Stopped(ConsumerExit),
}

pub struct IngestionConsumer {
    queue: Arc<dyn MessageQueue>,
    dispatcher: RecordDispatcher,
    clock: Arc<dyn Clock>,
}

impl IngestionConsumer {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        dispatcher: RecordDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            queue,
            dispatcher,
            clock,
        }
    }

    /// Consume until the stream ends, a fetch fails or `shutdown` resolves.
    ///
    /// `shutdown` is only observed while waiting for the next record, so a
    /// record in flight is always finished first.
    pub async fn run<F>(self, shutdown: F) -> (ConsumerExit, ConsumerStats)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut stats = ConsumerStats::default();
        let mut state = State::Connecting;

        let exit = loop {
            state = match state {
                State::Connecting => match self.queue.check_connection().await {
                    Ok(()) => {
                        tracing::info!("Message queue reachable, start consuming");
                        State::Reading
                    }
                    Err(e) => {
                        tracing::error!("Message queue unreachable, consumer stops: {}", e);
                        State::Stopped(ConsumerExit::Unreachable(e.to_string()))
                    }
                },
                State::Reading => tokio::select! {
                    _ = &mut shutdown => {
                        tracing::info!("Shutdown requested, consumer stops");
                        State::Stopped(ConsumerExit::Shutdown)
                    }
                    fetched = self.queue.fetch() => match fetched {
                        Ok(record) => State::Processing(record),
                        Err(QueueError::Closed) => {
                            tracing::info!("Message stream closed");
                            State::Stopped(ConsumerExit::StreamClosed)
                        }
                        Err(e) => {
                            tracing::error!("Failed to read from message queue: {}", e);
                            State::Stopped(ConsumerExit::FetchFailed(e.to_string()))
                        }
                    },
                },
                State::Processing(record) => {
                    let span = tracing::info_span!(
                        "record",
                        request_id = %Uuid::new_v4(),
                        partition = record.partition,
                        offset = record.offset,
                    );
                    if self.process(&record, &mut stats).instrument(span).await {
                        State::Committing(record)
                    } else {
                        State::Reading
                    }
                }
                State::Committing(record) => {
                    match self.queue.commit(&record).await {
                        Ok(()) => tracing::debug!(
                            "Committed offset {} on partition {}",
                            record.offset,
                            record.partition
                        ),
                        Err(e) => {
                            stats.commit_failures += 1;
                            tracing::warn!(
                                "Failed to commit offset {} on partition {}: {}",
                                record.offset,
                                record.partition,
                                e
                            );
                        }
                    }
                    State::Reading
                }
                State::Stopped(exit) => break exit,
            };
        };

        tracing::info!(
            "Consumer stopped ({:?}): processed={} skipped={} failed={} commit_failures={}",
            exit,
            stats.processed,
            stats.skipped,
            stats.failed,
            stats.commit_failures
        );
        (exit, stats)
    }

    /// Decode and apply one record. `true` when it should be committed.
    async fn process(&self, record: &QueueRecord, stats: &mut ConsumerStats) -> bool {
        let now = Timestamp::new(self.clock.now_millis());
        let command = match IngestCommand::decode(record, now) {
            Ok(command) => command,
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!("Skipping record with key {:?}: {}", record.key, e);
                return false;
            }
        };

        match self.dispatcher.dispatch(command).await {
            Ok(outcome) => {
                stats.processed += 1;
                tracing::debug!("Record applied: {:?}", outcome);
                true
            }
            Err(e) => {
                stats.failed += 1;
                tracing::error!("Failed to apply record: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{
        domain::{
            DeliveryStatus, MessageId, MessageRepository, NewUser, SocketPathAllocator, User,
            UserId, UserRepository, queue::MockMessageQueue,
        },
        infrastructure::repository::InMemoryStore,
        ingestion::{MESSAGE_KIND, UPDATE_STATUS_KIND},
        usecase::{CreateRoomUseCase, SaveMessageUseCase, UpdateMessageStatusUseCase},
    };
    use obrolan_shared::time::FixedClock;

    async fn register(store: &InMemoryStore, name: &str) -> User {
        store
            .users
            .register(
                NewUser {
                    id: UserId::generate(),
                    username: name.to_string(),
                    email: format!("{}@example.com", name),
                    password_hash: "hash".to_string(),
                    created_at: Timestamp::new(0),
                },
                &SocketPathAllocator::default(),
            )
            .await
            .unwrap()
    }

    fn dispatcher(store: &InMemoryStore) -> RecordDispatcher {
        RecordDispatcher::new(
            Arc::new(SaveMessageUseCase::new(
                store.rooms.clone(),
                store.messages.clone(),
                store.users.clone(),
                Arc::new(FixedClock::new(0)),
            )),
            Arc::new(UpdateMessageStatusUseCase::new(
                store.messages.clone(),
                Arc::new(FixedClock::new(0)),
            )),
        )
    }

    fn consumer(queue: MockMessageQueue, store: &InMemoryStore) -> IngestionConsumer {
        IngestionConsumer::new(
            Arc::new(queue),
            dispatcher(store),
            Arc::new(FixedClock::new(1_000)),
        )
    }

    /// A queue that serves `records` in order and then reports the stream closed.
    fn queue_serving(records: Vec<QueueRecord>) -> MockMessageQueue {
        let mut queue = MockMessageQueue::new();
        queue.expect_check_connection().returning(|| Ok(()));
        let mut records = VecDeque::from(records);
        queue
            .expect_fetch()
            .returning(move || records.pop_front().ok_or(QueueError::Closed));
        queue
    }

    fn at(mut record: QueueRecord, offset: i64) -> QueueRecord {
        record.offset = offset;
        record
    }

    async fn direct_room(store: &InMemoryStore, a: &User, b: &User) -> String {
        CreateRoomUseCase::new(
            store.rooms.clone(),
            store.users.clone(),
            Arc::new(FixedClock::new(0)),
        )
        .execute(a.id.clone(), vec![a.id.clone(), b.id.clone()], false, String::new())
        .await
        .unwrap()
        .id
        .into_string()
    }

    fn message_record(id: &str, room_id: &str, sender: &User) -> QueueRecord {
        QueueRecord::new(
            MESSAGE_KIND,
            format!(
                r#"{{"id":"{}","chat_room_id":"{}","sender_id":"{}","content":"hi","status":1}}"#,
                id, room_id, sender.id
            ),
        )
    }

    #[tokio::test]
    async fn test_unreachable_queue_stops_before_reading() {
        // テスト項目: 起動時の疎通確認に失敗したらレコードを読まずに終了する
        // given (前提条件):
        let store = InMemoryStore::new();
        let mut queue = MockMessageQueue::new();
        queue
            .expect_check_connection()
            .returning(|| Err(QueueError::Unreachable("no brokers".to_string())));
        queue.expect_fetch().never();
        queue.expect_commit().never();

        // when (操作):
        let (exit, stats) = consumer(queue, &store)
            .run(std::future::pending::<()>())
            .await;

        // then (期待する結果):
        assert!(matches!(exit, ConsumerExit::Unreachable(_)));
        assert_eq!(stats, ConsumerStats::default());
    }

    #[tokio::test]
    async fn test_commits_only_applied_records() {
        // テスト項目: 適用できたレコードのみコミットされ、失敗したレコードはスキップされる
        // given (前提条件):
        let store = InMemoryStore::new();
        let alice = register(&store, "alice").await;
        let bob = register(&store, "bob").await;
        let room_id = direct_room(&store, &alice, &bob).await;
        let records = vec![
            at(message_record("m1", &room_id, &alice), 0),
            at(QueueRecord::new("typing", "{}"), 1),
            at(QueueRecord::new(MESSAGE_KIND, "{broken"), 2),
            at(message_record("m2", "no-such-room", &alice), 3),
            at(
                QueueRecord::new(
                    UPDATE_STATUS_KIND,
                    format!(
                        r#"{{"message_id":"m1","receiver_id":"{}","status":2}}"#,
                        bob.id
                    ),
                ),
                4,
            ),
        ];
        let mut queue = queue_serving(records);
        queue
            .expect_commit()
            .withf(|record| record.offset == 0 || record.offset == 4)
            .times(2)
            .returning(|_| Ok(()));

        // when (操作):
        let (exit, stats) = consumer(queue, &store)
            .run(std::future::pending::<()>())
            .await;

        // then (期待する結果):
        assert_eq!(exit, ConsumerExit::StreamClosed);
        assert_eq!(
            stats,
            ConsumerStats {
                processed: 2,
                skipped: 2,
                failed: 1,
                commit_failures: 0,
            }
        );
        let room_id = crate::domain::RoomId::new(room_id).unwrap();
        let (page, _) = store.messages.find_by_room(&room_id, 0, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].message.id, MessageId::new("m1".to_string()).unwrap());
        assert_eq!(page[0].statuses[0].status, DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn test_commit_failure_is_not_fatal() {
        // テスト項目: コミットに失敗しても次のレコードの処理を続ける
        // given (前提条件):
        let store = InMemoryStore::new();
        let alice = register(&store, "alice").await;
        let bob = register(&store, "bob").await;
        let room_id = direct_room(&store, &alice, &bob).await;
        let mut queue = queue_serving(vec![
            at(message_record("m1", &room_id, &alice), 0),
            at(message_record("m2", &room_id, &bob), 1),
        ]);
        queue.expect_commit().times(2).returning(|record| {
            if record.offset == 0 {
                Err(QueueError::Commit("rebalance in progress".to_string()))
            } else {
                Ok(())
            }
        });

        // when (操作):
        let (exit, stats) = consumer(queue, &store)
            .run(std::future::pending::<()>())
            .await;

        // then (期待する結果):
        assert_eq!(exit, ConsumerExit::StreamClosed);
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.commit_failures, 1);
    }

    #[tokio::test]
    async fn test_fetch_error_stops_the_loop() {
        // テスト項目: 読み込みエラーでループが終了する
        // given (前提条件):
        let store = InMemoryStore::new();
        let mut queue = MockMessageQueue::new();
        queue.expect_check_connection().returning(|| Ok(()));
        queue
            .expect_fetch()
            .times(1)
            .returning(|| Err(QueueError::Fetch("broker transport failure".to_string())));

        // when (操作):
        let (exit, _) = consumer(queue, &store)
            .run(std::future::pending::<()>())
            .await;

        // then (期待する結果):
        assert_eq!(
            exit,
            ConsumerExit::FetchFailed("failed to fetch record: broker transport failure".to_string())
        );
    }

    #[tokio::test]
    async fn test_shutdown_while_waiting_for_records() {
        // テスト項目: レコード待ちの間にシャットダウンできる
        // given (前提条件):
        let store = InMemoryStore::new();
        let (_producer, queue) = crate::infrastructure::queue::InMemoryQueue::channel();
        let consumer = IngestionConsumer::new(
            Arc::new(queue),
            dispatcher(&store),
            Arc::new(FixedClock::new(0)),
        );

        // when (操作):
        let (exit, stats) = consumer.run(async {}).await;

        // then (期待する結果):
        assert_eq!(exit, ConsumerExit::Shutdown);
        assert_eq!(stats, ConsumerStats::default());
    }
}
