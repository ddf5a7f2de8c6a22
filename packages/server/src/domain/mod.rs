//! Domain layer: value objects, entities, and the interfaces the use cases
//! depend on.
//!
//! Infrastructure implements `repository` and `queue`; nothing in this module
//! depends on infrastructure.

pub mod credential;
pub mod entity;
pub mod error;
pub mod queue;
pub mod repository;
pub mod service;
pub mod value_object;

pub use credential::{CredentialError, PasswordHasher, TokenIssuer};
pub use entity::{
    ChatRoom, ChatRoomParticipant, Message, MessageStatus, MessageWithStatuses, NewUser,
    ParticipantDetail, RoomDetail, SocketPath, User,
};
pub use error::{QueueError, RepositoryError, ValueObjectError};
pub use queue::{MessageQueue, QueueRecord};
pub use repository::{ChatRoomRepository, MessageRepository, SaveOutcome, UserRepository};
pub use service::{SOCKET_PATH_CAPACITY, SocketPathAllocator};
pub use value_object::{
    DeliveryStatus, MessageId, MessageStatusId, ParticipantId, RoomId, SocketPathId, Timestamp,
    UserId,
};
