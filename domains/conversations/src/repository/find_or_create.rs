//! Atomic find-or-create for participant-set conversations
//!
//! The storage layer's unique participant key is the only authority on
//! uniqueness. A creator that loses a race gets `AlreadyExists` from the
//! store, re-runs the match once, and returns the winner's conversation.

use uuid::Uuid;

use crate::domain::entities::{
    Conversation, ConversationWithParticipants, Participant, ParticipantSet,
};
use crate::domain::matcher::find_exact_match;
use crate::domain::validation::ParticipantValidator;
use crate::repository::ConversationStore;
use parlor_common::{Error, RepositoryError, Result};

/// Outcome of `get_or_create`
#[derive(Debug, Clone, PartialEq)]
pub struct FindOrCreate {
    pub conversation: ConversationWithParticipants,
    /// `true` when this call stored the conversation
    pub created: bool,
}

/// Return the conversation with exactly `user_ids` as participants, creating it if absent.
///
/// Fails with `InvalidArgument` for fewer than two distinct ids and with
/// `NotFound` listing every unknown user. Nothing is written on failure.
pub async fn get_or_create<I>(
    store: &dyn ConversationStore,
    validator: &ParticipantValidator,
    user_ids: I,
) -> Result<FindOrCreate>
where
    I: IntoIterator<Item = Uuid>,
{
    let participants = ParticipantSet::new(user_ids)?;
    let ids = participants.to_vec();

    validator.validate(&ids).await?;

    if let Some(existing) = find_match(store, &participants, &ids).await? {
        tracing::debug!(conversation_id = %existing.id(), "Reusing existing conversation");
        return Ok(FindOrCreate {
            conversation: existing,
            created: false,
        });
    }

    let conversation = Conversation::new(&participants);
    let rows = Participant::for_conversation(&conversation, &participants);

    match store.insert_with_participants(&conversation, &rows).await {
        Ok(created) => {
            tracing::info!(
                conversation_id = %created.id(),
                participants = participants.len(),
                "Conversation created"
            );
            Ok(FindOrCreate {
                conversation: created,
                created: true,
            })
        }
        Err(RepositoryError::AlreadyExists) => {
            tracing::warn!(
                participant_key = %participants.canonical_key(),
                "Lost conversation creation race, re-reading winner"
            );
            let winner = find_match(store, &participants, &ids).await?.ok_or_else(|| {
                Error::Conflict("Conversation for these participants is being created".to_string())
            })?;
            Ok(FindOrCreate {
                conversation: winner,
                created: false,
            })
        }
        Err(other) => Err(other.into()),
    }
}

async fn find_match(
    store: &dyn ConversationStore,
    participants: &ParticipantSet,
    ids: &[Uuid],
) -> Result<Option<ConversationWithParticipants>> {
    let candidates = store.find_candidates(ids).await?;
    let Some(id) = find_exact_match(&candidates, participants) else {
        return Ok(None);
    };
    Ok(candidates.into_iter().find(|c| c.id() == id))
}
