//! Entities persisted by the store, plus the joined read models returned by
//! room and message queries.

use super::value_object::{
    DeliveryStatus, MessageId, MessageStatusId, ParticipantId, RoomId, SocketPathId, Timestamp,
    UserId,
};

/// A registered account.
///
/// `socket_path_id` is absent only for rows written before an endpoint was
/// assigned. Accounts are never removed; `deleted_at` marks a soft delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never the plain password
    pub password_hash: String,
    pub socket_path_id: Option<SocketPathId>,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Registration input handed to the store; the store assigns the socket path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl NewUser {
    pub fn into_user(self, socket_path_id: SocketPathId) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            socket_path_id: Some(socket_path_id),
            created_at: self.created_at,
            deleted_at: None,
        }
    }
}

/// A capacity-bounded real-time connection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketPath {
    pub id: SocketPathId,
    pub path: String,
}

impl SocketPath {
    /// Create a new endpoint whose path is derived from its identifier.
    pub fn generate() -> Self {
        let id = SocketPathId::generate();
        let path = format!("/ws/{}", id);
        Self { id, path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: RoomId,
    /// Stored name. Direct rooms are displayed under the other participant's
    /// username instead.
    pub name: String,
    pub is_group: bool,
    pub last_message_id: Option<MessageId>,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoomParticipant {
    pub id: ParticipantId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub joined_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    /// Aggregate status reported by the producer
    pub status: DeliveryStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Delivery status of one message towards one receiver (never the sender).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStatus {
    pub id: MessageStatusId,
    pub message_id: MessageId,
    pub receiver_id: UserId,
    pub status: DeliveryStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A membership row joined with its user and the user's endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantDetail {
    pub participant: ChatRoomParticipant,
    pub user: User,
    pub socket_path: Option<SocketPath>,
}

/// A room joined with its members and its most recent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub room: ChatRoom,
    pub participants: Vec<ParticipantDetail>,
    pub last_message: Option<Message>,
}

impl RoomDetail {
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants
            .iter()
            .any(|p| &p.participant.user_id == user_id)
    }

    pub fn participant_ids(&self) -> Vec<UserId> {
        self.participants
            .iter()
            .map(|p| p.participant.user_id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageWithStatuses {
    pub message: Message,
    pub statuses: Vec<MessageStatus>,
}
