//! Transactional free functions for Conversations domain

use crate::domain::entities::{Conversation, Participant};
use parlor_common::RepositoryError;
use sqlx::{Postgres, Transaction};

/// Insert a conversation within an existing transaction.
///
/// Returns `RepositoryError::AlreadyExists` if the participant key is
/// already taken (UNIQUE (participant_key)).
pub async fn insert_conversation_tx(
    transaction: &mut Transaction<'_, Postgres>,
    conversation: &Conversation,
) -> std::result::Result<Conversation, RepositoryError> {
    sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (id, participant_key, created_at)
        VALUES ($1, $2, $3)
        RETURNING id, participant_key, created_at
        "#,
    )
    .bind(conversation.id)
    .bind(&conversation.participant_key)
    .bind(conversation.created_at)
    .fetch_one(&mut **transaction)
    .await
    .map_err(RepositoryError::from_insert)
}

/// Insert participant rows within an existing transaction.
pub async fn insert_participants_tx(
    transaction: &mut Transaction<'_, Postgres>,
    participants: &[Participant],
) -> std::result::Result<Vec<Participant>, RepositoryError> {
    let conversation_ids: Vec<_> = participants.iter().map(|p| p.conversation_id).collect();
    let user_ids: Vec<_> = participants.iter().map(|p| p.user_id).collect();
    let joined_at: Vec<_> = participants.iter().map(|p| p.joined_at).collect();

    let created = sqlx::query_as::<_, Participant>(
        r#"
        INSERT INTO conversation_participants (conversation_id, user_id, joined_at)
        SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::timestamptz[])
        RETURNING conversation_id, user_id, joined_at
        "#,
    )
    .bind(&conversation_ids)
    .bind(&user_ids)
    .bind(&joined_at)
    .fetch_all(&mut **transaction)
    .await
    .map_err(RepositoryError::from_insert)?;

    Ok(created)
}
