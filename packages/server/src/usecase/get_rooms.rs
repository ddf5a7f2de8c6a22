//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{ChatRoomRepository, UserId};

use super::{error::GetRoomsError, pagination::PageRequest, view::RoomSummary};

/// ユーザーが参加しているルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    room_repository: Arc<dyn ChatRoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(room_repository: Arc<dyn ChatRoomRepository>) -> Self {
        Self { room_repository }
    }

    /// One page of `user_id`'s rooms, summarized from their point of view,
    /// together with the total number of rooms they belong to.
    pub async fn execute(
        &self,
        user_id: UserId,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<RoomSummary>, usize), GetRoomsError> {
        let page = PageRequest::new(page, limit).map_err(GetRoomsError::InvalidInput)?;

        let (rooms, total) = self
            .room_repository
            .find_rooms_by_user(&user_id, page.offset, page.limit)
            .await?;

        let summaries = rooms
            .iter()
            .map(|detail| RoomSummary::from_detail(detail, &user_id))
            .collect();
        Ok((summaries, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            DeliveryStatus, Message, MessageId, MessageRepository, NewUser, SocketPathAllocator,
            Timestamp, User, UserRepository,
        },
        infrastructure::repository::InMemoryStore,
        usecase::CreateRoomUseCase,
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

    #[tokio::test]
    async fn test_rooms_are_summarized_for_the_viewer() {
        // テスト項目: ルーム名は閲覧者から見た相手の名前になり、最新メッセージが含まれる
        // given (前提条件):
        let store = InMemoryStore::new();
        let alice = register(&store, "alice").await;
        let bob = register(&store, "bob").await;
        let create = CreateRoomUseCase::new(
            store.rooms.clone(),
            store.users.clone(),
            Arc::new(FixedClock::new(0)),
        );
        let room = create
            .execute(
                alice.id.clone(),
                vec![alice.id.clone(), bob.id.clone()],
                false,
                String::new(),
            )
            .await
            .unwrap();
        store
            .messages
            .save_message(
                Message {
                    id: MessageId::generate(),
                    room_id: room.id.clone(),
                    sender_id: alice.id.clone(),
                    content: "see you".to_string(),
                    status: DeliveryStatus::Sent,
                    created_at: Timestamp::new(1672531200000),
                    updated_at: Timestamp::new(1672531200000),
                },
                Vec::new(),
            )
            .await
            .unwrap();
        let usecase = GetRoomsUseCase::new(store.rooms.clone());

        // when (操作):
        let (bob_rooms, total) = usecase.execute(bob.id.clone(), 1, 10).await.unwrap();

        // then (期待する結果):
        assert_eq!(total, 1);
        assert_eq!(bob_rooms[0].name, "alice");
        assert_eq!(bob_rooms[0].last_message.as_deref(), Some("see you"));
        assert_eq!(
            bob_rooms[0].last_message_at,
            Some(Timestamp::new(1672531200000))
        );
    }

    #[tokio::test]
    async fn test_rejects_invalid_page() {
        // テスト項目: page が 1 未満なら InvalidInput
        // given (前提条件):
        let store = InMemoryStore::new();
        let usecase = GetRoomsUseCase::new(store.rooms.clone());

        // when (操作):
        let result = usecase.execute(UserId::generate(), 0, 10).await;

        // then (期待する結果):
        assert!(matches!(result, Err(GetRoomsError::InvalidInput(_))));
    }
}
