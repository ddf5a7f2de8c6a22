//! Domain error types.

use thiserror::Error;

/// Value object validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("unknown delivery status code: {0}")]
    UnknownStatusCode(u8),
}

/// Failures reported by the persistent store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The store could not be reached or did not answer.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write was rejected because it would break a referential or
    /// uniqueness rule. Nothing from the rejected write is persisted.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("email is already registered")]
    DuplicateEmail,

    #[error("username is already taken")]
    DuplicateUsername,

    /// A non-group room with the same participant pair already exists.
    #[error("direct room already exists for this pair")]
    DuplicateDirectRoom,
}

/// Failures reported by the message queue transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The broker could not be reached at all.
    #[error("queue unreachable: {0}")]
    Unreachable(String),

    /// The stream has ended and no further record will arrive.
    #[error("queue closed")]
    Closed,

    #[error("failed to fetch record: {0}")]
    Fetch(String),

    #[error("failed to commit offset: {0}")]
    Commit(String),
}
