use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    NewUser, RepositoryError, SocketPath, SocketPathAllocator, SocketPathId, User, UserId,
    UserRepository,
};

use super::Tables;

/// InMemory User Repository
///
/// `register` performs socket path selection and the user insert under one
/// lock, so concurrent registrations can never overfill a path.
pub struct InMemoryUserRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryUserRepository {
    pub fn new(tables: Arc<Mutex<Tables>>) -> Self {
        Self { tables }
    }

    /// Every socket path in creation order with the number of users on it.
    pub async fn socket_path_loads(&self) -> Vec<(SocketPath, usize)> {
        let tables = self.tables.lock().await;
        tables
            .socket_paths
            .iter()
            .map(|p| (p.clone(), tables.users_on(&p.id)))
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn register(
        &self,
        user: NewUser,
        allocator: &SocketPathAllocator,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().await;

        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(RepositoryError::DuplicateEmail);
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::DuplicateUsername);
        }
        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "user {} already exists",
                user.id
            )));
        }

        let selected: Option<SocketPathId> = {
            let loads: Vec<(&SocketPathId, usize)> = tables
                .socket_paths
                .iter()
                .map(|p| (&p.id, tables.users_on(&p.id)))
                .collect();
            allocator.select(loads).cloned()
        };

        let socket_path_id = match selected {
            Some(id) => id,
            None => {
                let path = SocketPath::generate();
                tracing::info!(
                    "All {} socket path(s) at capacity {}, created {}",
                    tables.socket_paths.len(),
                    allocator.capacity(),
                    path.path
                );
                let id = path.id.clone();
                tables.socket_paths.push(path);
                id
            }
        };

        let user = user.into_user(socket_path_id);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.user(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.is_active() && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<User>, RepositoryError> {
        let needle = query.to_lowercase();
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.is_active())
            .filter(|u| {
                u.username.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}
