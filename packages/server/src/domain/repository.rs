//! Repository trait 定義
//!
//! ユースケース層が必要とするデータアクセスのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! Every method is a single atomic unit against the store: either all of its
//! writes become visible to other readers or none do.

use async_trait::async_trait;

use super::{
    entity::{
        ChatRoom, ChatRoomParticipant, Message, MessageStatus, MessageWithStatuses, NewUser,
        ParticipantDetail, RoomDetail, User,
    },
    error::RepositoryError,
    service::SocketPathAllocator,
    value_object::{DeliveryStatus, MessageId, RoomId, Timestamp, UserId},
};

/// Result of an idempotent message write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The message was new; `statuses` receiver rows were created with it.
    Created { statuses: usize },
    /// A message with the same ID already existed; only its status changed.
    StatusUpdated,
    /// A message with the same ID already existed at the same or a later
    /// status; nothing was written.
    Unchanged,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and assign it a socket path in the same atomic step.
    ///
    /// The allocator picks the first stored path below capacity, or a fresh
    /// one when every path is full. Because selection and insert happen
    /// together, no path ever exceeds the allocator's capacity.
    async fn register(
        &self,
        user: NewUser,
        allocator: &SocketPathAllocator,
    ) -> Result<User, RepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Case-insensitive substring match on username or email.
    async fn search(&self, query: &str) -> Result<Vec<User>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// Persist a room together with its membership rows.
    async fn create_room(
        &self,
        room: ChatRoom,
        participants: Vec<ChatRoomParticipant>,
    ) -> Result<(), RepositoryError>;

    /// The non-group room whose participant set is exactly `{first, second}`.
    async fn find_direct_room(
        &self,
        first: &UserId,
        second: &UserId,
    ) -> Result<Option<RoomDetail>, RepositoryError>;

    async fn find_room_by_id(&self, id: &RoomId) -> Result<Option<RoomDetail>, RepositoryError>;

    async fn find_participants(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<ParticipantDetail>, RepositoryError>;

    /// One page of the rooms `user_id` belongs to, plus the total count.
    async fn find_rooms_by_user(
        &self,
        user_id: &UserId,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<RoomDetail>, usize), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Upsert a message by ID.
    ///
    /// A new message is inserted together with `statuses` and becomes its
    /// room's last message. An existing message only takes the new aggregate
    /// status, and only when it moves forward; `statuses` is ignored so
    /// receiver rows are never duplicated. Reusing an ID under another room is
    /// a constraint violation.
    async fn save_message(
        &self,
        message: Message,
        statuses: Vec<MessageStatus>,
    ) -> Result<SaveOutcome, RepositoryError>;

    /// Set the status of the `(message_id, receiver_id)` row in place and
    /// stamp it with `now`.
    ///
    /// Returns the number of rows changed: `0` when no such row exists or when
    /// the update would move the status backwards.
    async fn update_status(
        &self,
        message_id: &MessageId,
        receiver_id: &UserId,
        status: DeliveryStatus,
        now: Timestamp,
    ) -> Result<usize, RepositoryError>;

    /// One page of a room's messages in creation order, plus the total count.
    async fn find_by_room(
        &self,
        room_id: &RoomId,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<MessageWithStatuses>, usize), RepositoryError>;
}
