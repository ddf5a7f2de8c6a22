//! UseCase: メッセージ保存（キューから取り込んだメッセージ）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SaveMessageUseCase::execute() メソッド
//! - 送信者の検証と受信者ごとのステータス作成（fan-out）
//!
//! ### なぜこのテストが必要か
//! - N 人のルームに送られたメッセージには N-1 件の Sent ステータスが必要
//! - 同じメッセージ ID の再送で行が重複してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ダイレクト・グループでの送信、同じ ID の再送
//! - 異常系：存在しない送信者・ルーム、ルームに参加していない送信者、ストア障害

use std::sync::Arc;

use obrolan_shared::time::Clock;

use crate::domain::{
    ChatRoomRepository, Message, MessageRepository, SaveOutcome, Timestamp, UserRepository,
    service::fan_out_statuses,
};

use super::error::SaveMessageError;

/// メッセージ保存のユースケース
pub struct SaveMessageUseCase {
    room_repository: Arc<dyn ChatRoomRepository>,
    message_repository: Arc<dyn MessageRepository>,
    user_repository: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl SaveMessageUseCase {
    pub fn new(
        room_repository: Arc<dyn ChatRoomRepository>,
        message_repository: Arc<dyn MessageRepository>,
        user_repository: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_repository,
            message_repository,
            user_repository,
            clock,
        }
    }

    /// メッセージ保存を実行
    ///
    /// The message and one `Sent` status per other room member are written
    /// as one unit. Re-delivery of a known message ID only updates its status.
    pub async fn execute(&self, message: Message) -> Result<SaveOutcome, SaveMessageError> {
        // 1. 送信者とルームの検証
        if self
            .user_repository
            .find_by_id(&message.sender_id)
            .await?
            .is_none()
        {
            return Err(SaveMessageError::InvalidSender(message.sender_id.to_string()));
        }
        let room = self
            .room_repository
            .find_room_by_id(&message.room_id)
            .await?
            .ok_or_else(|| SaveMessageError::InvalidReceiver(message.room_id.to_string()))?;
        if !room.has_participant(&message.sender_id) {
            return Err(SaveMessageError::InvalidSender(format!(
                "{} is not a participant of room {}",
                message.sender_id, message.room_id
            )));
        }

        // 2. 受信者ごとのステータスを作成し、メッセージと一緒に保存
        let now = Timestamp::new(self.clock.now_millis());
        let statuses = fan_out_statuses(&message, &room.participant_ids(), now);
        let message_id = message.id.clone();
        let outcome = self
            .message_repository
            .save_message(message, statuses)
            .await?;

        match outcome {
            SaveOutcome::Created { statuses } => tracing::info!(
                "Message {} stored with {} receiver status(es)",
                message_id,
                statuses
            ),
            SaveOutcome::StatusUpdated => {
                tracing::info!("Message {} already stored, status updated", message_id)
            }
            SaveOutcome::Unchanged => {
                tracing::debug!("Message {} already stored at this status or later", message_id)
            }
        }
        Ok(outcome)
    }
}
