//! Credential interfaces used by registration and login.
//!
//! Token verification happens at the gateway in front of this service.

use thiserror::Error;

use super::entity::User;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("failed to issue token: {0}")]
    Token(String),
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// `false` for a wrong password and for an unreadable hash alike.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Opaque bearer token identifying `user`.
    fn issue(&self, user: &User) -> Result<String, CredentialError>;
}
