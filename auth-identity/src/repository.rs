use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{IdentityError, Result};
use crate::models::{Role, User};

/// Storage contract for user accounts.
///
/// The in-memory implementation backs the demo deployment; a persistent
/// store can be substituted without touching the identity service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User>;
    /// Look up a user by email within one role's account pool.
    async fn find_by_email(&self, email: &str, role: Role) -> Result<Option<User>>;
}

/// Writer-serialized in-memory user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.role == user.role && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(IdentityError::EmailAlreadyInUse);
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str, role: Role) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.role == role && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
