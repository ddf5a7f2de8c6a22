//! UseCase error types.

use thiserror::Error;

use crate::domain::{CredentialError, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("email already exists")]
    EmailTaken,

    #[error("username already exists")]
    UsernameTaken,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for RegisterError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateEmail => RegisterError::EmailTaken,
            RepositoryError::DuplicateUsername => RegisterError::UsernameTaken,
            other => RegisterError::Repository(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A listed participant does not resolve to a user.
    #[error("invalid sender: {0}")]
    InvalidSender(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,

    #[error("user is not a participant of the room")]
    Unauthorized,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessageHistoryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("user is not a participant of the room")]
    Unauthorized,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveMessageError {
    /// Unknown sender, or a sender who is not a member of the room.
    #[error("invalid sender: {0}")]
    InvalidSender(String),

    /// Unknown room.
    #[error("invalid receiver: {0}")]
    InvalidReceiver(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateMessageStatusError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchUsersError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
