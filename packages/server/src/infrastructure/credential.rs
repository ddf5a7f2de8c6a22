//! bcrypt password hashing and opaque session tokens.

use uuid::Uuid;

use crate::domain::{CredentialError, PasswordHasher, TokenIssuer, User};

/// bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl BcryptPasswordHasher {
    /// The cost is clamped to bcrypt's supported range (4..=31).
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        bcrypt::hash(password, self.cost).map_err(|e| CredentialError::Hash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

/// Random tokens with no embedded claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueTokenIssuer;

impl TokenIssuer for OpaqueTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, CredentialError> {
        tracing::debug!("Issuing session token for user {}", user.id);
        Ok(format!("{}.{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()))
    }
}
