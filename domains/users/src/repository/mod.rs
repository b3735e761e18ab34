//! Repository implementations for the Users domain

pub mod memory;
pub mod users;

use std::collections::HashSet;

use crate::domain::entities::User;
use parlor_common::Result;
use uuid::Uuid;

pub use memory::InMemoryUserRepository;
pub use users::PgUserRepository;

/// Storage port for users.
///
/// `existing_ids` is the boundary other domains use to check that the users
/// they reference exist.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the subset of `ids` that belong to registered users, in one lookup
    async fn existing_ids(&self, ids: &[Uuid]) -> Result<HashSet<Uuid>>;

    /// Get user by ID
    async fn find(&self, id: Uuid) -> Result<Option<User>>;

    /// Persist a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: &User) -> Result<User>;
}
