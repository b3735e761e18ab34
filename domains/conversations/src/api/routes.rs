//! Route definitions for Conversations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{conversations, messages};
use super::middleware::ConversationsState;

/// Create conversation routes
fn conversation_routes() -> Router<ConversationsState> {
    Router::new()
        .route(
            "/v1/conversations",
            post(conversations::create_conversation),
        )
        .route(
            "/v1/users/{user_id}/conversations",
            get(conversations::list_conversations),
        )
}

/// Create message routes
fn message_routes() -> Router<ConversationsState> {
    Router::new().route(
        "/v1/conversations/{conversation_id}/messages",
        get(messages::list_messages).post(messages::send_message),
    )
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new()
        .merge(conversation_routes())
        .merge(message_routes())
}
