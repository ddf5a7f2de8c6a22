//! Pure domain logic shared by the use cases and the store.
//!
//! Nothing here performs I/O, so each rule is tested directly.

use super::{
    entity::{Message, MessageStatus, RoomDetail, User},
    value_object::{DeliveryStatus, MessageStatusId, SocketPathId, Timestamp, UserId},
};

/// Users a single socket path may serve.
pub const SOCKET_PATH_CAPACITY: usize = 1000;

/// First-fit bin packing of users onto socket paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketPathAllocator {
    capacity: usize,
}

impl Default for SocketPathAllocator {
    fn default() -> Self {
        Self::new(SOCKET_PATH_CAPACITY)
    }
}

impl SocketPathAllocator {
    /// A zero capacity is raised to one so that allocation always terminates.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pick the first path, in stored order, whose load is below capacity.
    ///
    /// `None` means every path is full and a new one has to be created.
    pub fn select<'a, I>(&self, loads: I) -> Option<&'a SocketPathId>
    where
        I: IntoIterator<Item = (&'a SocketPathId, usize)>,
    {
        loads
            .into_iter()
            .find(|(_, load)| *load < self.capacity)
            .map(|(id, _)| id)
    }
}

/// One `Sent` status row per distinct room participant other than the sender.
pub fn fan_out_statuses(
    message: &Message,
    participants: &[UserId],
    now: Timestamp,
) -> Vec<MessageStatus> {
    let mut receivers: Vec<&UserId> = Vec::with_capacity(participants.len());
    for user_id in participants {
        if *user_id != message.sender_id && !receivers.contains(&user_id) {
            receivers.push(user_id);
        }
    }

    receivers
        .into_iter()
        .map(|receiver_id| MessageStatus {
            id: MessageStatusId::generate(),
            message_id: message.id.clone(),
            receiver_id: receiver_id.clone(),
            status: DeliveryStatus::Sent,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Name of a direct room as seen by `creator`: the username of the member
/// who is not the creator. When the creator is not a member at all the last
/// listed member wins.
pub fn direct_room_name(creator: &UserId, members: &[User]) -> Option<String> {
    members
        .iter()
        .rev()
        .find(|user| &user.id != creator)
        .map(|user| user.username.clone())
}

/// Name shown to `viewer` for a room: the other member's username for
/// direct rooms, the stored name for groups.
pub fn display_name(detail: &RoomDetail, viewer: &UserId) -> String {
    if detail.room.is_group {
        return detail.room.name.clone();
    }
    detail
        .participants
        .iter()
        .rev()
        .find(|p| &p.user.id != viewer)
        .map(|p| p.user.username.clone())
        .unwrap_or_else(|| detail.room.name.clone())
}

/// Status of a message as seen by `viewer`.
///
/// Receivers see their own row. The sender sees the least advanced row, so a
/// group message reads as `Read` only once every receiver has read it.
/// `None` when no row applies.
pub fn status_for_viewer(
    statuses: &[MessageStatus],
    sender: &UserId,
    viewer: &UserId,
) -> Option<DeliveryStatus> {
    if viewer == sender {
        statuses.iter().map(|s| s.status).min()
    } else {
        statuses
            .iter()
            .find(|s| &s.receiver_id == viewer)
            .map(|s| s.status)
    }
}
