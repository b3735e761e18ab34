//! Conversation service: the public operations of the messaging core
//!
//! Each operation composes validation, matching, and the two stores. The
//! service keeps no state of its own and caches nothing between calls.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{ConversationWithParticipants, Message, NewMessage};
use crate::domain::validation::ParticipantValidator;
use crate::repository::{get_or_create, ConversationsRepositories, FindOrCreate};
use parlor_common::{Error, Result};
use parlor_users::UserDirectory;

#[derive(Clone)]
pub struct ConversationService {
    repos: ConversationsRepositories,
    validator: ParticipantValidator,
}

impl ConversationService {
    pub fn new(repos: ConversationsRepositories, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            repos,
            validator: ParticipantValidator::new(users),
        }
    }

    /// Return the conversation for exactly `user_ids`, creating it on first request
    pub async fn create_or_get_conversation(&self, user_ids: Vec<Uuid>) -> Result<FindOrCreate> {
        get_or_create(self.repos.conversations.as_ref(), &self.validator, user_ids).await
    }

    /// Append a message from `sender_id` to `conversation_id`.
    ///
    /// The sender must be a participant of the conversation.
    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: String,
    ) -> Result<Message> {
        let message = NewMessage::new(conversation_id, sender_id, content)?;

        self.require_conversation(conversation_id).await?;

        if !self
            .repos
            .conversations
            .is_participant(conversation_id, sender_id)
            .await?
        {
            return Err(Error::Forbidden(
                "Sender is not a participant of this conversation".to_string(),
            ));
        }

        let stored = self.repos.messages.append(&message).await?;
        tracing::debug!(
            conversation_id = %conversation_id,
            message_id = %stored.id,
            sequence = stored.sequence,
            "Message appended"
        );
        Ok(stored)
    }

    /// Messages of a conversation in `(created_at, sequence)` order
    pub async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        if conversation_id.is_nil() {
            return Err(Error::InvalidArgument(
                "Conversation ID is required".to_string(),
            ));
        }

        self.require_conversation(conversation_id).await?;
        self.repos
            .messages
            .list_by_conversation(conversation_id)
            .await
    }

    /// All conversations `user_id` participates in, with participants attached
    pub async fn list_conversations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationWithParticipants>> {
        if user_id.is_nil() {
            return Err(Error::InvalidArgument("User ID is required".to_string()));
        }

        self.repos.conversations.list_for_user(user_id).await
    }

    async fn require_conversation(&self, conversation_id: Uuid) -> Result<()> {
        self.repos
            .conversations
            .find(conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;
        Ok(())
    }
}
