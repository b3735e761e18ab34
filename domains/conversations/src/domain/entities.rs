//! Domain entities for the Conversations domain
//!
//! A conversation is identified by its participant set: at most one
//! conversation exists per distinct set of users. Messages belong to exactly
//! one conversation and are ordered by `(created_at, sequence)`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parlor_common::{Error, Result};

/// Minimum number of distinct participants in a conversation
pub const MIN_PARTICIPANTS: usize = 2;

/// Maximum number of distinct participants in a conversation
pub const MAX_PARTICIPANTS: usize = 256;

/// Maximum message content length in characters (CHECK length <= 10000)
pub const MAX_CONTENT_LENGTH: usize = 10000;

/// Separator used in the canonical participant-set key
const KEY_SEPARATOR: &str = ",";

/// Normalized, deduplicated set of participant user ids.
///
/// Iteration order is ascending `Uuid` order, which is also the ascending
/// order of their hyphenated string forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantSet(BTreeSet<Uuid>);

impl ParticipantSet {
    /// Normalize `ids` into a participant set.
    ///
    /// Duplicate ids collapse into one participant. Fails with
    /// `InvalidArgument` when fewer than two distinct ids remain, when more
    /// than `MAX_PARTICIPANTS` are given, or when any id is nil.
    pub fn new<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = Uuid>,
    {
        let set: BTreeSet<Uuid> = ids.into_iter().collect();

        if set.contains(&Uuid::nil()) {
            return Err(Error::InvalidArgument(
                "User IDs must not be empty".to_string(),
            ));
        }
        if set.len() < MIN_PARTICIPANTS {
            return Err(Error::InvalidArgument(format!(
                "At least {} distinct users are required to create a conversation",
                MIN_PARTICIPANTS
            )));
        }
        if set.len() > MAX_PARTICIPANTS {
            return Err(Error::InvalidArgument(format!(
                "A conversation can have at most {} participants",
                MAX_PARTICIPANTS
            )));
        }

        Ok(Self(set))
    }

    /// Deterministic, order-independent encoding of the set
    pub fn canonical_key(&self) -> String {
        self.0
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, user_id: &Uuid) -> bool {
        self.0.contains(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uuid> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Uuid> {
        self.0.iter().copied().collect()
    }
}

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_key: String,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation for a participant set
    pub fn new(participants: &ParticipantSet) -> Self {
        Conversation {
            id: Uuid::new_v4(),
            participant_key: participants.canonical_key(),
            created_at: Utc::now(),
        }
    }
}

/// Participant link between a user and a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participant {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Build one participant row per user in the set, all joined at conversation creation
    pub fn for_conversation(
        conversation: &Conversation,
        participants: &ParticipantSet,
    ) -> Vec<Participant> {
        participants
            .iter()
            .map(|user_id| Participant {
                conversation_id: conversation.id,
                user_id: *user_id,
                joined_at: conversation.created_at,
            })
            .collect()
    }
}

/// Conversation together with its participant list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationWithParticipants {
    pub conversation: Conversation,
    pub participants: Vec<Participant>,
}

impl ConversationWithParticipants {
    pub fn id(&self) -> Uuid {
        self.conversation.id
    }

    /// Distinct user ids of the participants
    pub fn participant_ids(&self) -> BTreeSet<Uuid> {
        self.participants.iter().map(|p| p.user_id).collect()
    }
}

/// A message that has been validated but not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Create a new message with validation
    pub fn new(conversation_id: Uuid, sender_id: Uuid, content: String) -> Result<Self> {
        if conversation_id.is_nil() {
            return Err(Error::InvalidArgument(
                "Conversation ID is required".to_string(),
            ));
        }
        if sender_id.is_nil() {
            return Err(Error::InvalidArgument("Sender ID is required".to_string()));
        }
        Self::validate_content(&content)?;

        Ok(NewMessage {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content,
            created_at: Utc::now(),
        })
    }

    /// Validate message content (CHECK (length(trim(content)) > 0))
    fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(Error::InvalidArgument(format!(
                "Message content must be at most {} characters",
                MAX_CONTENT_LENGTH
            )));
        }
        Ok(())
    }
}

/// Stored message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Ordering key for retrieval
    pub fn order_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.sequence)
    }
}
