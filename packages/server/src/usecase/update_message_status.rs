//! UseCase: メッセージステータス更新

use std::sync::Arc;

use obrolan_shared::time::Clock;

use crate::domain::{DeliveryStatus, MessageId, MessageRepository, Timestamp, UserId};

use super::error::UpdateMessageStatusError;

/// 受信者ごとのステータス更新のユースケース
pub struct UpdateMessageStatusUseCase {
    message_repository: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateMessageStatusUseCase {
    pub fn new(message_repository: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_repository,
            clock,
        }
    }

    /// Apply `status` to the `(message_id, receiver_id)` row.
    ///
    /// No existence check is made: an unknown pair, or an update that would
    /// move the status backwards, changes nothing and returns `Ok(0)`.
    pub async fn execute(
        &self,
        message_id: MessageId,
        receiver_id: UserId,
        status: DeliveryStatus,
    ) -> Result<usize, UpdateMessageStatusError> {
        let now = Timestamp::new(self.clock.now_millis());
        let affected = self
            .message_repository
            .update_status(&message_id, &receiver_id, status, now)
            .await?;

        if affected == 0 {
            tracing::warn!(
                "Status update {:?} for message {} / receiver {} matched no row",
                status,
                message_id,
                receiver_id
            );
        } else {
            tracing::info!(
                "Message {} marked {:?} for receiver {}",
                message_id,
                status,
                receiver_id
            );
        }
        Ok(affected)
    }
}
