//! UseCase: ユーザー登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() メソッド
//! - 入力検証、パスワードのハッシュ化、ソケットパスの割り当て
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの登録
//! - 異常系：不正な入力、登録済みのメールアドレス・ユーザー名、ハッシュ化の失敗

use std::sync::Arc;

use obrolan_shared::time::Clock;

use crate::domain::{
    CredentialError, NewUser, PasswordHasher, SocketPathAllocator, Timestamp, UserId,
    UserRepository,
};

use super::{error::RegisterError, view::UserSummary};

/// Shortest accepted password.
const MIN_PASSWORD_LENGTH: usize = 8;

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    allocator: SocketPathAllocator,
    clock: Arc<dyn Clock>,
}

impl RegisterUserUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        allocator: SocketPathAllocator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            allocator,
            clock,
        }
    }

    /// ユーザー登録を実行
    ///
    /// The password is stored only as a hash, and the new user is placed on
    /// the first socket path with spare capacity.
    pub async fn execute(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<UserSummary, RegisterError> {
        // 1. 入力チェック
        let username = username.trim().to_string();
        let email = email.trim().to_string();
        if username.is_empty() {
            return Err(RegisterError::InvalidInput("username is required".to_string()));
        }
        if !email.contains('@') {
            return Err(RegisterError::InvalidInput(format!(
                "invalid email address: {}",
                email
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RegisterError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        // 2. 重複チェック（最終判定は登録時にストアが行う）
        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(RegisterError::EmailTaken);
        }

        // 3. パスワードのハッシュ化（bcrypt は CPU を占有するので blocking スレッドで実行）
        let hasher = self.password_hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| CredentialError::Hash(e.to_string()))??;

        // 4. 登録とソケットパス割り当て
        let user = self
            .user_repository
            .register(
                NewUser {
                    id: UserId::generate(),
                    username,
                    email,
                    password_hash,
                    created_at: Timestamp::new(self.clock.now_millis()),
                },
                &self.allocator,
            )
            .await?;

        tracing::info!(
            "User {} registered on socket path {:?}",
            user.id,
            user.socket_path_id.as_ref().map(|id| id.as_str())
        );
        Ok(UserSummary::from(&user))
    }
}
