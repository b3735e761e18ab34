//! Domain entities for the Users domain
//!
//! The messaging core only needs users as existence-checkable references;
//! the entity here carries the minimal registration profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parlor_common::{Error, Result};
use validator::ValidateEmail;

/// Maximum display name length (varchar(100))
const MAX_NAME_LENGTH: usize = 100;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with validation
    pub fn new(email: String, name: Option<String>) -> Result<Self> {
        // Validate email format (validator crate enforces RFC 5321 including length)
        if !email.validate_email() {
            return Err(Error::InvalidArgument("Invalid email format".to_string()));
        }

        if let Some(ref name) = name {
            if name.trim().is_empty() || name.chars().count() > MAX_NAME_LENGTH {
                return Err(Error::InvalidArgument(format!(
                    "Name must be 1-{} characters",
                    MAX_NAME_LENGTH
                )));
            }
        }

        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            name,
            created_at: now,
            updated_at: now,
        })
    }
}
