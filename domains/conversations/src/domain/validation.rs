//! Participant validation against the Users domain

use std::sync::Arc;

use parlor_common::{Error, Result};
use parlor_users::UserDirectory;
use uuid::Uuid;

/// Confirms that every referenced user exists before a conversation is created
#[derive(Clone)]
pub struct ParticipantValidator {
    users: Arc<dyn UserDirectory>,
}

impl ParticipantValidator {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Check all `user_ids` in one lookup.
    ///
    /// Every missing id is reported together in a single
    /// `Error::UsersNotFound`, sorted ascending.
    pub async fn validate(&self, user_ids: &[Uuid]) -> Result<()> {
        let existing = self.users.existing_ids(user_ids).await?;

        let mut missing: Vec<Uuid> = user_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .copied()
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        missing.sort();
        missing.dedup();
        Err(Error::UsersNotFound(missing))
    }
}
