//! UseCase: メッセージ履歴取得
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetMessageHistoryUseCase::execute() メソッド
//! - 閲覧者から見た送受信の向きとステータス
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者・受信者それぞれの視点での履歴取得、ページング
//! - 異常系：ルームに参加していないユーザーによる取得、不正なページ指定

use std::sync::Arc;

use crate::domain::{
    ChatRoomRepository, MessageRepository, RoomId, UserId, service::status_for_viewer,
};

use super::{
    error::GetMessageHistoryError,
    pagination::PageRequest,
    view::{Direction, MessageView},
};

/// ルームのメッセージ履歴取得のユースケース
pub struct GetMessageHistoryUseCase {
    room_repository: Arc<dyn ChatRoomRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl GetMessageHistoryUseCase {
    pub fn new(
        room_repository: Arc<dyn ChatRoomRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            room_repository,
            message_repository,
        }
    }

    /// One page of the room's messages in creation order, as seen by `user_id`.
    pub async fn execute(
        &self,
        user_id: UserId,
        room_id: RoomId,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<MessageView>, usize), GetMessageHistoryError> {
        let page = PageRequest::new(page, limit).map_err(GetMessageHistoryError::InvalidInput)?;

        let participants = self.room_repository.find_participants(&room_id).await?;
        if !participants.iter().any(|p| p.user.id == user_id) {
            return Err(GetMessageHistoryError::Unauthorized);
        }

        let (messages, total) = self
            .message_repository
            .find_by_room(&room_id, page.offset, page.limit)
            .await?;

        let views = messages
            .into_iter()
            .map(|entry| {
                let direction = if entry.message.sender_id == user_id {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                };
                let status = status_for_viewer(&entry.statuses, &entry.message.sender_id, &user_id);
                MessageView {
                    id: entry.message.id,
                    room_id: entry.message.room_id,
                    direction,
                    text: entry.message.content,
                    sent_at: entry.message.created_at,
                    status,
                }
            })
            .collect();
        Ok((views, total))
    }
}
