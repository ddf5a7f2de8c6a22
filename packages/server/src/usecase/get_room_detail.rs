//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{ChatRoomRepository, RoomId, UserId};

use super::{
    error::GetRoomDetailError,
    view::{ParticipantSummary, RoomSummary},
};

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    room_repository: Arc<dyn ChatRoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(room_repository: Arc<dyn ChatRoomRepository>) -> Self {
        Self { room_repository }
    }

    /// Summary of one room. Only its members may read it.
    pub async fn execute(
        &self,
        room_id: RoomId,
        viewer: UserId,
    ) -> Result<RoomSummary, GetRoomDetailError> {
        let detail = self
            .room_repository
            .find_room_by_id(&room_id)
            .await?
            .ok_or(GetRoomDetailError::RoomNotFound)?;

        if !detail.has_participant(&viewer) {
            return Err(GetRoomDetailError::Unauthorized);
        }
        Ok(RoomSummary::from_detail(&detail, &viewer))
    }

    /// Members of a room with their connection endpoints; empty for an
    /// unknown room.
    pub async fn participants(
        &self,
        room_id: RoomId,
    ) -> Result<Vec<ParticipantSummary>, GetRoomDetailError> {
        let participants = self.room_repository.find_participants(&room_id).await?;
        Ok(participants
            .into_iter()
            .map(|p| ParticipantSummary {
                user_id: p.user.id,
                username: p.user.username,
                socket_path: p.socket_path.map(|s| s.path),
            })
            .collect())
    }
}
