//! Conversion logic between DTOs and domain entities.

use chrono::DateTime;
use thiserror::Error;

use obrolan_shared::time::format_message_time;

use crate::{
    domain::{DeliveryStatus, Message, MessageId, RoomId, Timestamp, UserId, ValueObjectError},
    infrastructure::dto::{http as http_dto, queue as queue_dto},
    usecase::{MessageView, ParticipantSummary, RoomSummary, UserSummary},
};

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    InvalidField(#[from] ValueObjectError),

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
}

/// Milliseconds since the epoch for an RFC 3339 string, `fallback` when absent.
fn parse_timestamp(
    value: Option<&str>,
    fallback: Timestamp,
) -> Result<Timestamp, ConversionError> {
    match value {
        None => Ok(fallback),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Timestamp::new(dt.timestamp_millis()))
            .map_err(|_| ConversionError::InvalidTimestamp(raw.to_string())),
    }
}

// ========================================
// Queue DTO → Domain Entity
// ========================================

impl queue_dto::MessagePayload {
    /// Domain message for this payload. Missing timestamps take `now`;
    /// a missing `updated_at` follows `created_at`.
    pub fn into_message(self, now: Timestamp) -> Result<Message, ConversionError> {
        let created_at = parse_timestamp(self.created_at.as_deref(), now)?;
        let updated_at = parse_timestamp(self.updated_at.as_deref(), created_at)?;
        Ok(Message {
            id: MessageId::new(self.id)?,
            room_id: RoomId::new(self.chat_room_id)?,
            sender_id: UserId::new(self.sender_id)?,
            content: self.content,
            status: DeliveryStatus::from_code(self.status)?,
            created_at,
            updated_at,
        })
    }
}

impl queue_dto::MessageStatusPayload {
    /// The `(message, receiver)` row this payload targets and its new status.
    pub fn into_parts(self) -> Result<(MessageId, UserId, DeliveryStatus), ConversionError> {
        Ok((
            MessageId::new(self.message_id)?,
            UserId::new(self.receiver_id)?,
            DeliveryStatus::from_code(self.status)?,
        ))
    }
}

// ========================================
// UseCase View → HTTP DTO
// ========================================

impl From<UserSummary> for http_dto::UserDto {
    fn from(view: UserSummary) -> Self {
        Self {
            user_id: view.id.into_string(),
            username: view.username,
            email: view.email,
        }
    }
}

impl From<ParticipantSummary> for http_dto::ParticipantDto {
    fn from(view: ParticipantSummary) -> Self {
        Self {
            user_id: view.user_id.into_string(),
            username: view.username,
            socket_path: view.socket_path,
        }
    }
}

impl From<RoomSummary> for http_dto::RoomDto {
    fn from(view: RoomSummary) -> Self {
        Self {
            id: view.id.into_string(),
            name: view.name,
            is_group: view.is_group,
            last_message: view.last_message,
            last_message_time: view.last_message_at.map(|t| format_message_time(t.value())),
            participants: view.participants.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<MessageView> for http_dto::MessageDto {
    fn from(view: MessageView) -> Self {
        Self {
            id: view.id.into_string(),
            room_id: view.room_id.into_string(),
            direction: view.direction.as_str().to_string(),
            text: view.text,
            time: format_message_time(view.sent_at.value()),
            status: view.status.map_or(0, DeliveryStatus::code),
        }
    }
}
