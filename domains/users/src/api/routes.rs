//! Route definitions for Users domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::users;
use super::middleware::UsersState;

/// Create all Users domain API routes
pub fn routes() -> Router<UsersState> {
    Router::new()
        .route("/v1/users", post(users::register_user))
        .route("/v1/users/{user_id}", get(users::get_user))
}
