//! JSON payloads carried by queue records.
//!
//! Field names follow the producers' wire format. Timestamps are RFC 3339
//! strings and may be omitted, in which case ingestion time is used.

use serde::{Deserialize, Serialize};

/// Value of a `"message"` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: String,
    #[serde(alias = "room_id")]
    pub chat_room_id: String,
    pub sender_id: String,
    pub content: String,
    #[serde(default = "sent_code")]
    pub status: u8,
    #[serde(default, alias = "CreatedAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, alias = "UpdatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Value of an `"update_status"` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStatusPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message_id: String,
    pub receiver_id: String,
    pub status: u8,
    #[serde(default, alias = "UpdatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn sent_code() -> u8 {
    1
}
