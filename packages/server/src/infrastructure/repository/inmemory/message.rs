use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DeliveryStatus, Message, MessageId, MessageRepository, MessageStatus, MessageWithStatuses,
    RepositoryError, RoomId, SaveOutcome, Timestamp, UserId,
};

use super::Tables;

/// InMemory Message Repository
///
/// A new message, its receiver status rows and the room's last-message
/// pointer are written in one step; a rejected row rejects all of them.
pub struct InMemoryMessageRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryMessageRepository {
    pub fn new(tables: Arc<Mutex<Tables>>) -> Self {
        Self { tables }
    }
}

fn check_new_message(
    tables: &Tables,
    message: &Message,
    statuses: &[MessageStatus],
) -> Result<(), RepositoryError> {
    if tables.room(&message.room_id).is_none() {
        return Err(RepositoryError::ConstraintViolation(format!(
            "room {} does not exist",
            message.room_id
        )));
    }
    if tables.user(&message.sender_id).is_none() {
        return Err(RepositoryError::ConstraintViolation(format!(
            "sender {} does not exist",
            message.sender_id
        )));
    }

    let mut receivers = BTreeSet::new();
    for status in statuses {
        if status.message_id != message.id {
            return Err(RepositoryError::ConstraintViolation(format!(
                "status {} refers to message {}",
                status.id, status.message_id
            )));
        }
        if status.receiver_id == message.sender_id {
            return Err(RepositoryError::ConstraintViolation(format!(
                "sender {} cannot be a receiver of its own message",
                status.receiver_id
            )));
        }
        if tables.user(&status.receiver_id).is_none() {
            return Err(RepositoryError::ConstraintViolation(format!(
                "receiver {} does not exist",
                status.receiver_id
            )));
        }
        if !receivers.insert(&status.receiver_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate status for receiver {} on message {}",
                status.receiver_id, message.id
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn save_message(
        &self,
        message: Message,
        statuses: Vec<MessageStatus>,
    ) -> Result<SaveOutcome, RepositoryError> {
        let mut tables = self.tables.lock().await;

        if let Some(existing) = tables.messages.iter_mut().find(|m| m.id == message.id) {
            if existing.room_id != message.room_id {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "message {} belongs to room {}",
                    existing.id, existing.room_id
                )));
            }
            if existing.status == message.status
                || !existing.status.can_advance_to(message.status)
            {
                return Ok(SaveOutcome::Unchanged);
            }
            existing.status = message.status;
            existing.updated_at = message.updated_at;
            return Ok(SaveOutcome::StatusUpdated);
        }

        check_new_message(&tables, &message, &statuses)?;

        let created = statuses.len();
        if let Some(room) = tables.rooms.iter_mut().find(|r| r.id == message.room_id) {
            room.last_message_id = Some(message.id.clone());
        }
        tables.messages.push(message);
        tables.statuses.extend(statuses);
        Ok(SaveOutcome::Created { statuses: created })
    }

    async fn update_status(
        &self,
        message_id: &MessageId,
        receiver_id: &UserId,
        status: DeliveryStatus,
        now: Timestamp,
    ) -> Result<usize, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(row) = tables
            .statuses
            .iter_mut()
            .find(|s| &s.message_id == message_id && &s.receiver_id == receiver_id)
        else {
            return Ok(0);
        };

        if !row.status.can_advance_to(status) {
            return Ok(0);
        }
        row.status = status;
        row.updated_at = now;
        Ok(1)
    }

    async fn find_by_room(
        &self,
        room_id: &RoomId,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<MessageWithStatuses>, usize), RepositoryError> {
        let tables = self.tables.lock().await;
        let mut messages: Vec<&Message> = tables
            .messages
            .iter()
            .filter(|m| &m.room_id == room_id)
            .collect();
        messages.sort_by_key(|m| m.created_at);

        let total = messages.len();
        let page = messages
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|m| MessageWithStatuses {
                message: m.clone(),
                statuses: tables
                    .statuses
                    .iter()
                    .filter(|s| s.message_id == m.id)
                    .cloned()
                    .collect(),
            })
            .collect();
        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChatRoom, ChatRoomParticipant, ChatRoomRepository, MessageStatusId, NewUser,
        ParticipantId, SocketPathAllocator, User, UserRepository, service::fan_out_statuses,
    };
    use crate::infrastructure::repository::InMemoryStore;

    struct Fixture {
        store: InMemoryStore,
        room_id: RoomId,
        members: Vec<User>,
    }

    async fn fixture(names: &[&str]) -> Fixture {
        let store = InMemoryStore::new();
        let mut members = Vec::new();
        for name in names {
            let user = store
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
                .unwrap();
            members.push(user);
        }
        let room = ChatRoom {
            id: RoomId::generate(),
            name: "room".to_string(),
            is_group: members.len() > 2,
            last_message_id: None,
            created_at: Timestamp::new(0),
            deleted_at: None,
        };
        let participants = members
            .iter()
            .map(|u| ChatRoomParticipant {
                id: ParticipantId::generate(),
                room_id: room.id.clone(),
                user_id: u.id.clone(),
                joined_at: Timestamp::new(0),
            })
            .collect();
        let room_id = room.id.clone();
        store.rooms.create_room(room, participants).await.unwrap();
        Fixture {
            store,
            room_id,
            members,
        }
    }

    fn message(id: &str, fixture: &Fixture, created_at: i64) -> Message {
        Message {
            id: MessageId::new(id.to_string()).unwrap(),
            room_id: fixture.room_id.clone(),
            sender_id: fixture.members[0].id.clone(),
            content: format!("content of {}", id),
            status: DeliveryStatus::Sent,
            created_at: Timestamp::new(created_at),
            updated_at: Timestamp::new(created_at),
        }
    }

    fn statuses_for(message: &Message, fixture: &Fixture) -> Vec<MessageStatus> {
        let ids: Vec<UserId> = fixture.members.iter().map(|u| u.id.clone()).collect();
        fan_out_statuses(message, &ids, message.created_at)
    }

    #[tokio::test]
    async fn test_save_message_creates_statuses_and_last_message() {
        // テスト項目: 新規メッセージは受信者ステータスと一緒に保存され、最新メッセージになる
        // given (前提条件):
        let fixture = fixture(&["alice", "bob", "carol"]).await;
        let msg = message("m1", &fixture, 10);
        let statuses = statuses_for(&msg, &fixture);

        // when (操作):
        let outcome = fixture
            .store
            .messages
            .save_message(msg.clone(), statuses)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome, SaveOutcome::Created { statuses: 2 });
        let (page, total) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 0, 10)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].statuses.len(), 2);
        let room = fixture
            .store
            .rooms
            .find_room_by_id(&fixture.room_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(room.last_message, Some(msg));
    }

    #[tokio::test]
    async fn test_save_message_twice_only_updates_status() {
        // テスト項目: 同じ ID のメッセージを再保存すると status のみ更新される（行は増えない）
        // given (前提条件):
        let fixture = fixture(&["alice", "bob"]).await;
        let msg = message("m1", &fixture, 10);
        let statuses = statuses_for(&msg, &fixture);
        fixture
            .store
            .messages
            .save_message(msg.clone(), statuses)
            .await
            .unwrap();

        // when (操作):
        let mut again = msg.clone();
        again.status = DeliveryStatus::Delivered;
        again.content = "changed".to_string();
        let again_statuses = statuses_for(&again, &fixture);
        let outcome = fixture
            .store
            .messages
            .save_message(again, again_statuses)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome, SaveOutcome::StatusUpdated);
        let (page, total) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 0, 10)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].message.status, DeliveryStatus::Delivered);
        assert_eq!(page[0].message.content, msg.content);
        assert_eq!(page[0].statuses.len(), 1);
    }

    #[tokio::test]
    async fn test_redelivered_older_status_does_not_move_backwards() {
        // テスト項目: 古いステータスでの再配信は既存の集約ステータスを後退させない
        // given (前提条件):
        let fixture = fixture(&["alice", "bob"]).await;
        let mut msg = message("m1", &fixture, 10);
        msg.status = DeliveryStatus::Read;
        msg.updated_at = Timestamp::new(15);
        let statuses = statuses_for(&msg, &fixture);
        fixture
            .store
            .messages
            .save_message(msg.clone(), statuses)
            .await
            .unwrap();

        // when (操作):
        let mut stale = message("m1", &fixture, 10);
        stale.updated_at = Timestamp::new(40);
        let stale_statuses = statuses_for(&stale, &fixture);
        let outcome = fixture
            .store
            .messages
            .save_message(stale, stale_statuses)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome, SaveOutcome::Unchanged);
        let (page, _) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 0, 10)
            .await
            .unwrap();
        assert_eq!(page[0].message.status, DeliveryStatus::Read);
        assert_eq!(page[0].message.updated_at, Timestamp::new(15));
    }

    #[tokio::test]
    async fn test_save_message_with_same_id_in_other_room_is_rejected() {
        // テスト項目: 既存 ID のメッセージを別ルームとして保存しようとするとエラーになり、何も変わらない
        // given (前提条件):
        let fixture = fixture(&["alice", "bob"]).await;
        let msg = message("m1", &fixture, 10);
        let statuses = statuses_for(&msg, &fixture);
        fixture
            .store
            .messages
            .save_message(msg.clone(), statuses)
            .await
            .unwrap();

        // when (操作):
        let mut moved = msg.clone();
        moved.room_id = RoomId::generate();
        moved.status = DeliveryStatus::Read;
        let result = fixture.store.messages.save_message(moved, Vec::new()).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RepositoryError::ConstraintViolation(_))
        ));
        let (page, _) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 0, 10)
            .await
            .unwrap();
        assert_eq!(page[0].message.status, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn test_save_message_rolls_back_on_bad_status_row() {
        // テスト項目: ステータス行の 1 つが不正なら、メッセージも含めて何も保存されない
        // given (前提条件):
        let fixture = fixture(&["alice", "bob", "carol"]).await;
        let msg = message("m1", &fixture, 10);
        let mut statuses = statuses_for(&msg, &fixture);
        statuses.push(MessageStatus {
            id: MessageStatusId::generate(),
            message_id: msg.id.clone(),
            receiver_id: fixture.members[1].id.clone(),
            status: DeliveryStatus::Sent,
            created_at: Timestamp::new(10),
            updated_at: Timestamp::new(10),
        });

        // when (操作):
        let result = fixture.store.messages.save_message(msg, statuses).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RepositoryError::ConstraintViolation(_))
        ));
        let (page, total) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 0, 10)
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 0);
        let room = fixture
            .store
            .rooms
            .find_room_by_id(&fixture.room_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(room.room.last_message_id, None);
    }

    #[tokio::test]
    async fn test_update_status_in_place_and_monotonic() {
        // テスト項目: ステータスはその場で更新され、後退する更新は 0 件扱い
        // given (前提条件):
        let fixture = fixture(&["alice", "bob"]).await;
        let msg = message("m1", &fixture, 10);
        let statuses = statuses_for(&msg, &fixture);
        fixture
            .store
            .messages
            .save_message(msg.clone(), statuses)
            .await
            .unwrap();
        let bob = fixture.members[1].id.clone();

        // when (操作):
        let read = fixture
            .store
            .messages
            .update_status(&msg.id, &bob, DeliveryStatus::Read, Timestamp::new(20))
            .await
            .unwrap();
        let backwards = fixture
            .store
            .messages
            .update_status(&msg.id, &bob, DeliveryStatus::Delivered, Timestamp::new(30))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(read, 1);
        assert_eq!(backwards, 0);
        let (page, _) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 0, 10)
            .await
            .unwrap();
        assert_eq!(page[0].statuses.len(), 1);
        assert_eq!(page[0].statuses[0].status, DeliveryStatus::Read);
        assert_eq!(page[0].statuses[0].updated_at, Timestamp::new(20));
    }

    #[tokio::test]
    async fn test_update_status_unknown_pair_affects_nothing() {
        // テスト項目: 存在しない (message, receiver) の更新は 0 件でエラーにならず、行も作られない
        // given (前提条件):
        let fixture = fixture(&["alice", "bob"]).await;

        // when (操作):
        let affected = fixture
            .store
            .messages
            .update_status(
                &MessageId::generate(),
                &fixture.members[1].id,
                DeliveryStatus::Delivered,
                Timestamp::new(20),
            )
            .await;

        // then (期待する結果):
        assert_eq!(affected, Ok(0));
        let (page, total) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 0, 10)
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_find_by_room_orders_by_creation_time() {
        // テスト項目: 履歴は作成時刻順でページングされる
        // given (前提条件):
        let fixture = fixture(&["alice", "bob"]).await;
        for (id, at) in [("late", 30), ("early", 10), ("middle", 20)] {
            let msg = message(id, &fixture, at);
            let statuses = statuses_for(&msg, &fixture);
            fixture
                .store
                .messages
                .save_message(msg, statuses)
                .await
                .unwrap();
        }

        // when (操作):
        let (page, total) = fixture
            .store
            .messages
            .find_by_room(&fixture.room_id, 1, 2)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(total, 3);
        let ids: Vec<&str> = page.iter().map(|m| m.message.id.as_str()).collect();
        assert_eq!(ids, vec!["middle", "late"]);
    }
}
