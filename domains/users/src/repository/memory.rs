//! In-memory user repository
//!
//! Used by the `memory` storage backend and by tests across the workspace.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::repository::UserDirectory;
use parlor_common::{Error, Result};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with the given email, returning its id
    pub async fn seed(&self, email: &str) -> Result<Uuid> {
        let user = User::new(email.to_string(), None)?;
        Ok(self.create(&user).await?.id)
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryUserRepository {
    async fn existing_ids(&self, ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter(|id| users.contains_key(id))
            .copied()
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(Error::Conflict("Email is already registered".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}
