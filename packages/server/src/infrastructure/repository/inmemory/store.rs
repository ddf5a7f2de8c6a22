//! Shared table storage and the bundle of repositories built over it.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ChatRoom, ChatRoomParticipant, Message, MessageId, MessageStatus, ParticipantDetail, RoomDetail,
    RoomId, SocketPath, SocketPathId, User, UserId,
};

use super::{InMemoryChatRoomRepository, InMemoryMessageRepository, InMemoryUserRepository};

/// Rows of every entity, each table in insertion order.
#[derive(Debug, Default)]
pub struct Tables {
    pub(super) users: Vec<User>,
    pub(super) socket_paths: Vec<SocketPath>,
    pub(super) rooms: Vec<ChatRoom>,
    pub(super) participants: Vec<ChatRoomParticipant>,
    pub(super) messages: Vec<Message>,
    pub(super) statuses: Vec<MessageStatus>,
}

impl Tables {
    /// Active (not soft-deleted) user
    pub(super) fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id && u.is_active())
    }

    pub(super) fn socket_path(&self, id: &SocketPathId) -> Option<&SocketPath> {
        self.socket_paths.iter().find(|p| &p.id == id)
    }

    /// Users referencing a socket path, soft-deleted ones included.
    pub(super) fn users_on(&self, id: &SocketPathId) -> usize {
        self.users
            .iter()
            .filter(|u| u.socket_path_id.as_ref() == Some(id))
            .count()
    }

    /// Live (not soft-deleted) room
    pub(super) fn room(&self, id: &RoomId) -> Option<&ChatRoom> {
        self.rooms
            .iter()
            .find(|r| &r.id == id && r.deleted_at.is_none())
    }

    pub(super) fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub(super) fn member_ids(&self, room_id: &RoomId) -> Vec<&UserId> {
        self.participants
            .iter()
            .filter(|p| &p.room_id == room_id)
            .map(|p| &p.user_id)
            .collect()
    }

    pub(super) fn participant_details(&self, room_id: &RoomId) -> Vec<ParticipantDetail> {
        self.participants
            .iter()
            .filter(|p| &p.room_id == room_id)
            .filter_map(|p| {
                let user = self.user(&p.user_id)?;
                let socket_path = user
                    .socket_path_id
                    .as_ref()
                    .and_then(|id| self.socket_path(id))
                    .cloned();
                Some(ParticipantDetail {
                    participant: p.clone(),
                    user: user.clone(),
                    socket_path,
                })
            })
            .collect()
    }

    pub(super) fn room_detail(&self, room: &ChatRoom) -> RoomDetail {
        RoomDetail {
            room: room.clone(),
            participants: self.participant_details(&room.id),
            last_message: room
                .last_message_id
                .as_ref()
                .and_then(|id| self.message(id))
                .cloned(),
        }
    }
}

/// Every repository over one shared set of tables.
#[derive(Clone)]
pub struct InMemoryStore {
    pub users: Arc<InMemoryUserRepository>,
    pub rooms: Arc<InMemoryChatRoomRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        let tables = Arc::new(Mutex::new(Tables::default()));
        Self {
            users: Arc::new(InMemoryUserRepository::new(tables.clone())),
            rooms: Arc::new(InMemoryChatRoomRepository::new(tables.clone())),
            messages: Arc::new(InMemoryMessageRepository::new(tables)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
