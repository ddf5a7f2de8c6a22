//! UseCase: チャットルーム作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - ダイレクトルームの重複排除（同じペアには同じルームを返す）
//! - 同じペアへの並行リクエストでもダイレクトルームは 1 つだけ作られる
//!
//! ### なぜこのテストが必要か
//! - ユーザーのペアごとにダイレクトルームは高々 1 つでなければならない
//! - グループルームは同じメンバーでも常に新規作成される
//!
//! ### どのような状況を想定しているか
//! - 正常系：ダイレクトルーム作成、既存ルームの再利用、グループ作成
//! - 異常系：参加者不足、存在しないユーザー、重複した参加者

use std::{collections::BTreeSet, sync::Arc};

use obrolan_shared::time::Clock;

use crate::domain::{
    ChatRoom, ChatRoomParticipant, ChatRoomRepository, ParticipantId, RepositoryError, RoomId,
    Timestamp, User, UserId, UserRepository, service::direct_room_name,
};

use super::{error::CreateRoomError, view::RoomSummary};

/// チャットルーム作成のユースケース
pub struct CreateRoomUseCase {
    room_repository: Arc<dyn ChatRoomRepository>,
    user_repository: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(
        room_repository: Arc<dyn ChatRoomRepository>,
        user_repository: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_repository,
            user_repository,
            clock,
        }
    }

    /// ルーム作成を実行
    ///
    /// Two participants without `is_group` make a direct room: its name is
    /// derived from the non-creator's username and an existing direct room
    /// for the same pair is returned instead of creating a new one. The store
    /// rejects a second direct room for a pair, so a request that loses a race
    /// returns the winner's room. Anything else makes a group room named
    /// `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSummary)` - 作成した（または既存の）ルームを作成者視点で要約したもの
    /// * `Err(CreateRoomError)` - 作成失敗
    pub async fn execute(
        &self,
        creator: UserId,
        user_ids: Vec<UserId>,
        is_group: bool,
        name: String,
    ) -> Result<RoomSummary, CreateRoomError> {
        // 1. 入力チェック
        if user_ids.len() < 2 {
            return Err(CreateRoomError::InvalidInput(
                "at least two participants are required to create a chat room".to_string(),
            ));
        }
        let distinct: BTreeSet<&UserId> = user_ids.iter().collect();
        if distinct.len() != user_ids.len() {
            return Err(CreateRoomError::InvalidInput(
                "participants must be distinct users".to_string(),
            ));
        }

        // 2. 参加者をユーザーに解決
        let members = self.resolve_members(&user_ids).await?;

        // 3. ダイレクトルームなら既存ルームを探す
        let direct = user_ids.len() == 2 && !is_group;
        let mut name = name;
        if direct {
            if let Some(derived) = direct_room_name(&creator, &members) {
                name = derived;
            }
            if let Some(existing) = self
                .room_repository
                .find_direct_room(&user_ids[0], &user_ids[1])
                .await?
            {
                tracing::debug!(
                    "Reusing direct room {} for {} and {}",
                    existing.room.id,
                    user_ids[0],
                    user_ids[1]
                );
                return Ok(RoomSummary::from_detail(&existing, &creator));
            }
        }

        // 4. ルームと参加者をまとめて作成
        let now = Timestamp::new(self.clock.now_millis());
        let room = ChatRoom {
            id: RoomId::generate(),
            name,
            is_group: !direct,
            last_message_id: None,
            created_at: now,
            deleted_at: None,
        };
        let participants = user_ids
            .iter()
            .map(|user_id| ChatRoomParticipant {
                id: ParticipantId::generate(),
                room_id: room.id.clone(),
                user_id: user_id.clone(),
                joined_at: now,
            })
            .collect();
        let room_id = room.id.clone();
        match self.room_repository.create_room(room, participants).await {
            Ok(()) => {}
            Err(RepositoryError::DuplicateDirectRoom) => {
                // 並行リクエストが先にダイレクトルームを作成した
                let existing = self
                    .room_repository
                    .find_direct_room(&user_ids[0], &user_ids[1])
                    .await?
                    .ok_or_else(|| {
                        RepositoryError::Unavailable(format!(
                            "direct room for {} and {} unreadable after conflict",
                            user_ids[0], user_ids[1]
                        ))
                    })?;
                tracing::debug!(
                    "Direct room {} was created concurrently; reusing it",
                    existing.room.id
                );
                return Ok(RoomSummary::from_detail(&existing, &creator));
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(
            "Room {} created by {} with {} participant(s)",
            room_id,
            creator,
            user_ids.len()
        );

        let detail = self
            .room_repository
            .find_room_by_id(&room_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::Unavailable(format!("room {} unreadable after create", room_id))
            })?;
        Ok(RoomSummary::from_detail(&detail, &creator))
    }

    async fn resolve_members(&self, user_ids: &[UserId]) -> Result<Vec<User>, CreateRoomError> {
        let mut members = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            match self.user_repository.find_by_id(user_id).await? {
                Some(user) => members.push(user),
                None => return Err(CreateRoomError::InvalidSender(user_id.to_string())),
            }
        }
        Ok(members)
    }
}
