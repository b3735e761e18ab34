//! Conversation repository

use std::collections::HashMap;

use crate::domain::entities::{Conversation, ConversationWithParticipants, Participant};
use crate::repository::transactions::{insert_conversation_tx, insert_participants_tx};
use parlor_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Storage port for conversations and their participants
#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    /// Find conversation by ID
    async fn find(&self, id: Uuid) -> Result<Option<Conversation>>;

    /// Conversations sharing at least one participant with `user_ids`,
    /// each with its full participant list
    async fn find_candidates(&self, user_ids: &[Uuid]) -> Result<Vec<ConversationWithParticipants>>;

    /// Insert a conversation and all of its participants as one unit.
    ///
    /// Returns `RepositoryError::AlreadyExists` when a conversation with the
    /// same participant key is already stored. Nothing is written in that case.
    async fn insert_with_participants(
        &self,
        conversation: &Conversation,
        participants: &[Participant],
    ) -> std::result::Result<ConversationWithParticipants, RepositoryError>;

    /// Whether `user_id` is a participant of `conversation_id`
    async fn is_participant(&self, conversation_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Every conversation `user_id` participates in, newest first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationWithParticipants>>;
}

#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load participant lists for `conversations` in one query
    async fn attach_participants(
        &self,
        conversations: Vec<Conversation>,
    ) -> Result<Vec<ConversationWithParticipants>> {
        if conversations.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = conversations.iter().map(|c| c.id).collect();
        let rows = sqlx::query_as::<_, Participant>(
            r#"
            SELECT conversation_id, user_id, joined_at
            FROM conversation_participants
            WHERE conversation_id = ANY($1)
            ORDER BY joined_at ASC, user_id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_conversation: HashMap<Uuid, Vec<Participant>> = HashMap::new();
        for row in rows {
            by_conversation
                .entry(row.conversation_id)
                .or_default()
                .push(row);
        }

        Ok(conversations
            .into_iter()
            .map(|conversation| ConversationWithParticipants {
                participants: by_conversation.remove(&conversation.id).unwrap_or_default(),
                conversation,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl ConversationStore for PgConversationRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Conversation>> {
        let conv = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, participant_key, created_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(conv)
    }

    async fn find_candidates(&self, user_ids: &[Uuid]) -> Result<Vec<ConversationWithParticipants>> {
        let convs = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.id, c.participant_key, c.created_at
            FROM conversations c
            WHERE EXISTS (
                SELECT 1 FROM conversation_participants p
                WHERE p.conversation_id = c.id AND p.user_id = ANY($1)
            )
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        self.attach_participants(convs).await
    }

    async fn insert_with_participants(
        &self,
        conversation: &Conversation,
        participants: &[Participant],
    ) -> std::result::Result<ConversationWithParticipants, RepositoryError> {
        // Dropping the transaction without commit rolls back both inserts
        let mut transaction = self.pool.begin().await?;

        let created = insert_conversation_tx(&mut transaction, conversation).await?;
        let participants = insert_participants_tx(&mut transaction, participants).await?;

        transaction.commit().await?;

        Ok(ConversationWithParticipants {
            conversation: created,
            participants,
        })
    }

    async fn is_participant(&self, conversation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM conversation_participants
                WHERE conversation_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationWithParticipants>> {
        let convs = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.id, c.participant_key, c.created_at
            FROM conversations c
            JOIN conversation_participants p ON p.conversation_id = c.id
            WHERE p.user_id = $1
            ORDER BY c.created_at DESC, c.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_participants(convs).await
    }
}
