//! UseCase: ユーザー検索

use std::sync::Arc;

use crate::domain::{UserId, UserRepository};

use super::{error::SearchUsersError, view::UserSummary};

/// ユーザー検索のユースケース
pub struct SearchUsersUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl SearchUsersUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Users whose username or email contains `query`, excluding the caller.
    /// A blank query matches nobody.
    pub async fn execute(
        &self,
        query: &str,
        exclude: &UserId,
    ) -> Result<Vec<UserSummary>, SearchUsersError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.user_repository.search(query).await?;
        Ok(users
            .iter()
            .filter(|user| &user.id != exclude)
            .map(UserSummary::from)
            .collect())
    }
}
