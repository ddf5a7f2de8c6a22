//! Read models returned by the use cases.
//!
//! Times stay as [`Timestamp`]s here; formatting belongs to the DTO layer.

use crate::domain::{
    DeliveryStatus, MessageId, RoomDetail, RoomId, Timestamp, User, UserId,
    service::display_name,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSummary {
    pub user_id: UserId,
    pub username: String,
    /// Connection endpoint, absent while unassigned
    pub socket_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    /// Name as seen by the viewer
    pub name: String,
    pub is_group: bool,
    pub last_message: Option<String>,
    pub last_message_at: Option<Timestamp>,
    pub participants: Vec<ParticipantSummary>,
}

impl RoomSummary {
    /// Summarize `detail` from `viewer`'s point of view.
    pub fn from_detail(detail: &RoomDetail, viewer: &UserId) -> Self {
        Self {
            id: detail.room.id.clone(),
            name: display_name(detail, viewer),
            is_group: detail.room.is_group,
            last_message: detail.last_message.as_ref().map(|m| m.content.clone()),
            last_message_at: detail.last_message.as_ref().map(|m| m.created_at),
            participants: detail
                .participants
                .iter()
                .map(|p| ParticipantSummary {
                    user_id: p.user.id.clone(),
                    username: p.user.username.clone(),
                    socket_path: p.socket_path.as_ref().map(|s| s.path.clone()),
                })
                .collect(),
        }
    }
}

/// Whether a message was sent or received by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub room_id: RoomId,
    pub direction: Direction,
    pub text: String,
    pub sent_at: Timestamp,
    /// Status as seen by the viewer; `None` when no receiver row applies
    pub status: Option<DeliveryStatus>,
}
