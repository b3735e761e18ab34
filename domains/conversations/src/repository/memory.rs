//! In-memory conversation and message store
//!
//! Backs the `memory` storage backend and the test suites. Every mutation
//! runs inside one write-lock critical section, which is where the
//! participant-key uniqueness and the all-or-nothing creation are enforced.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{
    Conversation, ConversationWithParticipants, Message, NewMessage, Participant,
};
use crate::repository::{ConversationStore, MessageStore};
use parlor_common::{Error, RepositoryError, Result};

#[derive(Default)]
struct StoreState {
    conversations: HashMap<Uuid, Conversation>,
    by_key: HashMap<String, Uuid>,
    participants: HashMap<Uuid, Vec<Participant>>,
    by_user: HashMap<Uuid, BTreeSet<Uuid>>,
    messages: HashMap<Uuid, Vec<Message>>,
    last_sequence: i64,
}

impl StoreState {
    fn with_participants(&self, conversation: &Conversation) -> ConversationWithParticipants {
        ConversationWithParticipants {
            conversation: conversation.clone(),
            participants: self
                .participants
                .get(&conversation.id)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn is_member(&self, conversation_id: Uuid, user_id: Uuid) -> bool {
        self.by_user
            .get(&user_id)
            .is_some_and(|ids| ids.contains(&conversation_id))
    }

    /// Conversations any of `user_ids` participates in, via the per-user index
    fn conversations_of<'u>(
        &self,
        user_ids: impl IntoIterator<Item = &'u Uuid>,
    ) -> Vec<ConversationWithParticipants> {
        let ids: BTreeSet<Uuid> = user_ids
            .into_iter()
            .filter_map(|u| self.by_user.get(u))
            .flatten()
            .copied()
            .collect();

        ids.iter()
            .filter_map(|id| self.conversations.get(id))
            .map(|c| self.with_participants(c))
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations whose participant key equals `key`
    pub async fn count_with_key(&self, key: &str) -> usize {
        self.state
            .read()
            .await
            .conversations
            .values()
            .filter(|c| c.participant_key == key)
            .count()
    }

    /// Total number of stored conversations
    pub async fn conversation_count(&self) -> usize {
        self.state.read().await.conversations.len()
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find(&self, id: Uuid) -> Result<Option<Conversation>> {
        Ok(self.state.read().await.conversations.get(&id).cloned())
    }

    async fn find_candidates(&self, user_ids: &[Uuid]) -> Result<Vec<ConversationWithParticipants>> {
        let state = self.state.read().await;

        let mut found = state.conversations_of(user_ids);
        found.sort_by_key(|c| (c.conversation.created_at, c.conversation.id));

        Ok(found)
    }

    async fn insert_with_participants(
        &self,
        conversation: &Conversation,
        participants: &[Participant],
    ) -> std::result::Result<ConversationWithParticipants, RepositoryError> {
        let mut state = self.state.write().await;

        if state.by_key.contains_key(&conversation.participant_key)
            || state.conversations.contains_key(&conversation.id)
        {
            return Err(RepositoryError::AlreadyExists);
        }

        let mut seen = BTreeSet::new();
        for p in participants {
            if p.conversation_id != conversation.id {
                return Err(RepositoryError::InvalidData(
                    "Participant belongs to a different conversation".to_string(),
                ));
            }
            if !seen.insert(p.user_id) {
                return Err(RepositoryError::AlreadyExists);
            }
        }

        state
            .by_key
            .insert(conversation.participant_key.clone(), conversation.id);
        state
            .conversations
            .insert(conversation.id, conversation.clone());
        state
            .participants
            .insert(conversation.id, participants.to_vec());
        for p in participants {
            state
                .by_user
                .entry(p.user_id)
                .or_default()
                .insert(conversation.id);
        }

        Ok(state.with_participants(conversation))
    }

    async fn is_participant(&self, conversation_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self.state.read().await.is_member(conversation_id, user_id))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationWithParticipants>> {
        let state = self.state.read().await;

        let mut found = state.conversations_of([&user_id]);
        found.sort_by(|a, b| {
            b.conversation
                .created_at
                .cmp(&a.conversation.created_at)
                .then(a.conversation.id.cmp(&b.conversation.id))
        });

        Ok(found)
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryConversationStore {
    async fn append(&self, msg: &NewMessage) -> Result<Message> {
        let mut state = self.state.write().await;

        if !state.conversations.contains_key(&msg.conversation_id) {
            return Err(Error::NotFound("Conversation not found".to_string()));
        }

        state.last_sequence += 1;
        let stored = Message {
            id: msg.id,
            conversation_id: msg.conversation_id,
            sender_id: msg.sender_id,
            content: msg.content.clone(),
            sequence: state.last_sequence,
            created_at: msg.created_at,
        };

        state
            .messages
            .entry(msg.conversation_id)
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let state = self.state.read().await;

        let mut messages = state
            .messages
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default();
        messages.sort_by_key(Message::order_key);

        Ok(messages)
    }
}
