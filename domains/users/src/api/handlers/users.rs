//! User API handlers
//!
//! - POST /v1/users - Register a user
//! - GET /v1/users/{user_id} - Get a single user

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use parlor_common::{Error, Result, ValidatedJson, ValidatedPath};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::UsersState;
use crate::User;

/// Request for registering a user
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

/// User response DTO
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register a new user
pub async fn register_user(
    State(state): State<UsersState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = User::new(req.email, req.name)?;
    let created = state.users.create(&user).await?;

    tracing::info!(user_id = %created.id, "User registered");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single user by ID
pub async fn get_user(
    State(state): State<UsersState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<UserResponse>> {
    let user = state
        .users
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
