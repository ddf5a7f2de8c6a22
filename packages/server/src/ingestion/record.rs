//! Record decoding and routing.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{DeliveryStatus, Message, MessageId, QueueRecord, SaveOutcome, Timestamp, UserId},
    infrastructure::dto::{
        conversion::ConversionError,
        queue::{MessagePayload, MessageStatusPayload},
    },
    usecase::{
        SaveMessageError, SaveMessageUseCase, UpdateMessageStatusError, UpdateMessageStatusUseCase,
    },
};

/// Key of a record carrying a new message
pub const MESSAGE_KIND: &str = "message";
/// Key of a record carrying a receiver status change
pub const UPDATE_STATUS_KIND: &str = "update_status";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown record kind {0:?}")]
    UnknownKind(String),

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid field: {0}")]
    InvalidField(String),
}

impl From<ConversionError> for DecodeError {
    fn from(error: ConversionError) -> Self {
        DecodeError::InvalidField(error.to_string())
    }
}

/// A decoded queue record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestCommand {
    SaveMessage(Message),
    UpdateStatus {
        message_id: MessageId,
        receiver_id: UserId,
        status: DeliveryStatus,
    },
}

impl IngestCommand {
    /// Decode `record` by its key. `now` fills in missing message timestamps.
    pub fn decode(record: &QueueRecord, now: Timestamp) -> Result<Self, DecodeError> {
        match record.key.as_deref() {
            Some(MESSAGE_KIND) => {
                let payload: MessagePayload = serde_json::from_slice(&record.payload)?;
                Ok(IngestCommand::SaveMessage(payload.into_message(now)?))
            }
            Some(UPDATE_STATUS_KIND) => {
                let payload: MessageStatusPayload = serde_json::from_slice(&record.payload)?;
                let (message_id, receiver_id, status) = payload.into_parts()?;
                Ok(IngestCommand::UpdateStatus {
                    message_id,
                    receiver_id,
                    status,
                })
            }
            Some(other) => Err(DecodeError::UnknownKind(other.to_string())),
            None => Err(DecodeError::UnknownKind(String::new())),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    SaveMessage(#[from] SaveMessageError),

    #[error(transparent)]
    UpdateStatus(#[from] UpdateMessageStatusError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Saved(SaveOutcome),
    StatusUpdated { affected: usize },
}

/// Routes decoded records to the use case that applies them.
///
/// Built once by the entry point and owned by the consumer.
pub struct RecordDispatcher {
    save_message_usecase: Arc<SaveMessageUseCase>,
    update_message_status_usecase: Arc<UpdateMessageStatusUseCase>,
}

impl RecordDispatcher {
    pub fn new(
        save_message_usecase: Arc<SaveMessageUseCase>,
        update_message_status_usecase: Arc<UpdateMessageStatusUseCase>,
    ) -> Self {
        Self {
            save_message_usecase,
            update_message_status_usecase,
        }
    }

    pub async fn dispatch(&self, command: IngestCommand) -> Result<DispatchOutcome, DispatchError> {
        match command {
            IngestCommand::SaveMessage(message) => {
                let outcome = self.save_message_usecase.execute(message).await?;
                Ok(DispatchOutcome::Saved(outcome))
            }
            IngestCommand::UpdateStatus {
                message_id,
                receiver_id,
                status,
            } => {
                let affected = self
                    .update_message_status_usecase
                    .execute(message_id, receiver_id, status)
                    .await?;
                Ok(DispatchOutcome::StatusUpdated { affected })
            }
        }
    }
}
