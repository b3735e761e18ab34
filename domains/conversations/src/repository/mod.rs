//! Repository implementations for Conversations domain

pub mod conversations;
pub mod find_or_create;
pub mod memory;
pub mod messages;
pub mod transactions;

use std::sync::Arc;

use sqlx::PgPool;

pub use conversations::{ConversationStore, PgConversationRepository};
pub use find_or_create::{get_or_create, FindOrCreate};
pub use memory::InMemoryConversationStore;
pub use messages::{MessageStore, PgMessageRepository};
pub use transactions::{insert_conversation_tx, insert_participants_tx};

/// Combined repository access for the Conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pub conversations: Arc<dyn ConversationStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl ConversationsRepositories {
    /// Repositories backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            conversations: Arc::new(PgConversationRepository::new(pool.clone())),
            messages: Arc::new(PgMessageRepository::new(pool)),
        }
    }

    /// Repositories backed by one shared in-memory store
    pub fn in_memory(store: InMemoryConversationStore) -> Self {
        Self {
            conversations: Arc::new(store.clone()),
            messages: Arc::new(store),
        }
    }
}
