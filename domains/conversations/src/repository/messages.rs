//! Message repository

use crate::domain::entities::{Message, NewMessage};
use parlor_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Storage port for messages
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    /// Append an immutable message, assigning its sequence
    async fn append(&self, message: &NewMessage) -> Result<Message>;

    /// Messages of a conversation ordered by `(created_at, sequence)` ascending
    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>>;
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageStore for PgMessageRepository {
    async fn append(&self, msg: &NewMessage) -> Result<Message> {
        // sequence comes from a BIGSERIAL column, monotonic across writers
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, conversation_id, sender_id, content, sequence, created_at
            "#,
        )
        .bind(msg.id)
        .bind(msg.conversation_id)
        .bind(msg.sender_id)
        .bind(&msg.content)
        .bind(msg.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, sequence, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, sequence ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
