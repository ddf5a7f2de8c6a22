use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatRoom, ChatRoomParticipant, ChatRoomRepository, ParticipantDetail, RepositoryError,
    RoomDetail, RoomId, UserId,
};

use super::Tables;

/// InMemory ChatRoom Repository
pub struct InMemoryChatRoomRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryChatRoomRepository {
    pub fn new(tables: Arc<Mutex<Tables>>) -> Self {
        Self { tables }
    }
}

/// Reject the whole write before touching any table.
fn check_new_room(
    tables: &Tables,
    room: &ChatRoom,
    participants: &[ChatRoomParticipant],
) -> Result<(), RepositoryError> {
    if tables.rooms.iter().any(|r| r.id == room.id) {
        return Err(RepositoryError::ConstraintViolation(format!(
            "room {} already exists",
            room.id
        )));
    }
    if participants.is_empty() {
        return Err(RepositoryError::ConstraintViolation(format!(
            "room {} has no participants",
            room.id
        )));
    }

    let mut seen_users = BTreeSet::new();
    for participant in participants {
        if participant.room_id != room.id {
            return Err(RepositoryError::ConstraintViolation(format!(
                "participant {} belongs to room {}",
                participant.id, participant.room_id
            )));
        }
        if tables.user(&participant.user_id).is_none() {
            return Err(RepositoryError::ConstraintViolation(format!(
                "user {} does not exist",
                participant.user_id
            )));
        }
        if !seen_users.insert(&participant.user_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "user {} listed twice in room {}",
                participant.user_id, room.id
            )));
        }
    }
    if !room.is_group && find_direct(tables, &seen_users).is_some() {
        return Err(RepositoryError::DuplicateDirectRoom);
    }
    Ok(())
}

/// The live non-group room whose member set equals `wanted`.
fn find_direct<'a>(tables: &'a Tables, wanted: &BTreeSet<&UserId>) -> Option<&'a ChatRoom> {
    tables
        .rooms
        .iter()
        .filter(|r| !r.is_group && r.deleted_at.is_none())
        .find(|r| {
            let members: BTreeSet<&UserId> = tables.member_ids(&r.id).into_iter().collect();
            &members == wanted
        })
}

#[async_trait]
impl ChatRoomRepository for InMemoryChatRoomRepository {
    async fn create_room(
        &self,
        room: ChatRoom,
        participants: Vec<ChatRoomParticipant>,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        check_new_room(&tables, &room, &participants)?;

        tables.rooms.push(room);
        tables.participants.extend(participants);
        Ok(())
    }

    async fn find_direct_room(
        &self,
        first: &UserId,
        second: &UserId,
    ) -> Result<Option<RoomDetail>, RepositoryError> {
        let wanted: BTreeSet<&UserId> = [first, second].into_iter().collect();
        let tables = self.tables.lock().await;

        Ok(find_direct(&tables, &wanted).map(|r| tables.room_detail(r)))
    }

    async fn find_room_by_id(&self, id: &RoomId) -> Result<Option<RoomDetail>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.room(id).map(|r| tables.room_detail(r)))
    }

    async fn find_participants(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<ParticipantDetail>, RepositoryError> {
        let tables = self.tables.lock().await;
        if tables.room(room_id).is_none() {
            return Ok(Vec::new());
        }
        Ok(tables.participant_details(room_id))
    }

    async fn find_rooms_by_user(
        &self,
        user_id: &UserId,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<RoomDetail>, usize), RepositoryError> {
        let tables = self.tables.lock().await;
        let rooms: Vec<&ChatRoom> = tables
            .rooms
            .iter()
            .filter(|r| r.deleted_at.is_none())
            .filter(|r| tables.member_ids(&r.id).contains(&user_id))
            .collect();

        let total = rooms.len();
        let page = rooms
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|r| tables.room_detail(r))
            .collect();
        Ok((page, total))
    }
}
