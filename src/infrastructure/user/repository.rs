//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository, keyed by username
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username().to_string(), user))
            .collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(user.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }

        users.insert(user.username().to_string(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        match users.get_mut(user.username()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user.clone())
            }
            None => Err(DomainError::user_not_found(user.username())),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }
}
