//! Message API handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use parlor_common::{Result, ValidatedJson, ValidatedPath};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::Message;

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub sender_id: Uuid,

    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_id: m.sender_id,
            content: m.content,
            sequence: m.sequence,
            created_at: m.created_at,
        }
    }
}

/// Send a message to a conversation
pub async fn send_message(
    State(state): State<ConversationsState>,
    ValidatedPath(conversation_id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let message = state
        .service
        .send_message(conversation_id, req.sender_id, req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// List messages for a conversation, oldest first
pub async fn list_messages(
    State(state): State<ConversationsState>,
    ValidatedPath(conversation_id): ValidatedPath<Uuid>,
) -> Result<Json<Vec<MessageResponse>>> {
    let messages = state.service.list_messages(conversation_id).await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
