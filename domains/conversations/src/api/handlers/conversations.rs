//! Conversation API handlers

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
use crate::domain::entities::{ConversationWithParticipants, Participant};

/// Request for creating (or reusing) a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    /// Participant user ids; order and duplicates are irrelevant.
    /// The distinct-member limit is applied after deduplication.
    pub user_ids: Vec<Uuid>,
}

/// Participant response DTO
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl From<Participant> for ParticipantResponse {
    fn from(p: Participant) -> Self {
        Self {
            user_id: p.user_id,
            joined_at: p.joined_at,
        }
    }
}

/// Conversation response DTO
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub participants: Vec<ParticipantResponse>,
}

impl From<ConversationWithParticipants> for ConversationResponse {
    fn from(c: ConversationWithParticipants) -> Self {
        Self {
            id: c.conversation.id,
            created_at: c.conversation.created_at,
            participants: c.participants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create a conversation for a participant set, or return the existing one
///
/// Responds 201 when a conversation was stored by this request, 200 when an
/// existing one was returned.
pub async fn create_conversation(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>)> {
    let outcome = state
        .service
        .create_or_get_conversation(req.user_ids)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.conversation.into())))
}

/// List conversations a user participates in
pub async fn list_conversations(
    State(state): State<ConversationsState>,
    ValidatedPath(user_id): ValidatedPath<Uuid>,
) -> Result<Json<Vec<ConversationResponse>>> {
    let convs = state.service.list_conversations_for_user(user_id).await?;

    let responses: Vec<ConversationResponse> = convs.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
