//! UseCase: ログイン

use std::sync::Arc;

use crate::domain::{PasswordHasher, TokenIssuer, UserRepository};

use super::error::LoginError;

/// ログインのユースケース
pub struct LoginUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl LoginUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_issuer,
        }
    }

    /// Exchange email and password for a session token.
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn execute(&self, email: &str, password: &str) -> Result<String, LoginError> {
        let Some(user) = self.user_repository.find_by_email(email.trim()).await? else {
            return Err(LoginError::InvalidCredentials);
        };

        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .unwrap_or(false);
        if !verified {
            tracing::info!("Login rejected for user {}", user.id);
            return Err(LoginError::InvalidCredentials);
        }

        Ok(self.token_issuer.issue(&user)?)
    }
}
