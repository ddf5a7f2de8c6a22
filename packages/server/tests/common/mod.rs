//! Wiring shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use obrolan_server::{
    domain::{SocketPathAllocator, UserId},
    infrastructure::{
        credential::{BcryptPasswordHasher, OpaqueTokenIssuer},
        queue::InMemoryQueue,
        repository::InMemoryStore,
    },
    ingestion::{IngestionConsumer, RecordDispatcher},
    ui::Server,
    usecase::{
        CreateRoomUseCase, GetMessageHistoryUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        LoginUseCase, RegisterUserUseCase, SaveMessageUseCase, SearchUsersUseCase,
        UpdateMessageStatusUseCase,
    },
};
use obrolan_shared::time::FixedClock;

/// Fixed "now" used by every test clock: 2023-01-01 09:00 JST
pub const NOW: i64 = 1_672_531_200_000;

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(NOW))
}

/// Registration with the cheapest bcrypt cost.
pub fn register_usecase(store: &InMemoryStore, capacity: usize) -> RegisterUserUseCase {
    RegisterUserUseCase::new(
        store.users.clone(),
        Arc::new(BcryptPasswordHasher::new(4)),
        SocketPathAllocator::new(capacity),
        clock(),
    )
}

pub async fn register(store: &InMemoryStore, name: &str) -> UserId {
    register_usecase(store, 1000)
        .execute(
            name.to_string(),
            format!("{}@example.com", name),
            "password123".to_string(),
        )
        .await
        .expect("registration should succeed")
        .id
}

pub fn create_room_usecase(store: &InMemoryStore) -> CreateRoomUseCase {
    CreateRoomUseCase::new(store.rooms.clone(), store.users.clone(), clock())
}

pub fn dispatcher(store: &InMemoryStore) -> RecordDispatcher {
    RecordDispatcher::new(
        Arc::new(SaveMessageUseCase::new(
            store.rooms.clone(),
            store.messages.clone(),
            store.users.clone(),
            clock(),
        )),
        Arc::new(UpdateMessageStatusUseCase::new(
            store.messages.clone(),
            clock(),
        )),
    )
}

pub fn consumer(store: &InMemoryStore, queue: Arc<InMemoryQueue>) -> IngestionConsumer {
    IngestionConsumer::new(queue, dispatcher(store), clock())
}

pub fn server(store: &InMemoryStore) -> Server {
    let hasher = Arc::new(BcryptPasswordHasher::new(4));
    Server::new(
        Arc::new(RegisterUserUseCase::new(
            store.users.clone(),
            hasher.clone(),
            SocketPathAllocator::default(),
            clock(),
        )),
        Arc::new(LoginUseCase::new(
            store.users.clone(),
            hasher,
            Arc::new(OpaqueTokenIssuer),
        )),
        Arc::new(SearchUsersUseCase::new(store.users.clone())),
        Arc::new(create_room_usecase(store)),
        Arc::new(GetRoomsUseCase::new(store.rooms.clone())),
        Arc::new(GetRoomDetailUseCase::new(store.rooms.clone())),
        Arc::new(GetMessageHistoryUseCase::new(
            store.rooms.clone(),
            store.messages.clone(),
        )),
    )
}

pub fn message_json(id: &str, room_id: &str, sender_id: &UserId, content: &str) -> String {
    serde_json::json!({
        "id": id,
        "chat_room_id": room_id,
        "sender_id": sender_id.as_str(),
        "content": content,
        "status": 1,
    })
    .to_string()
}

pub fn status_json(message_id: &str, receiver_id: &UserId, status: u8) -> String {
    serde_json::json!({
        "message_id": message_id,
        "receiver_id": receiver_id.as_str(),
        "status": status,
    })
    .to_string()
}
