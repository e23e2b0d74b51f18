//! Account storage for the placeholder authentication routes.
//!
//! Accounts only live for the lifetime of the process.

use super::StorageError;
use crate::models::UserRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get an account by email
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Insert an account; fails if the email is already registered
    async fn insert_user(&self, user: UserRecord) -> Result<(), StorageError>;
}

pub type SharedUserStore = Arc<dyn UserStore>;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_user(&self, user: UserRecord) -> Result<(), StorageError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StorageError::ConstraintViolation(format!(
                "user {} already exists",
                user.email
            )));
        }
        users.insert(user.email.clone(), user);
        Ok(())
    }
}
