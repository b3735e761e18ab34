//! Conversations domain: participant-set conversations and direct messages

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Conversation, ConversationWithParticipants, Message, NewMessage, Participant, ParticipantSet,
};
pub use domain::matcher::find_exact_match;
pub use domain::validation::ParticipantValidator;

// Re-export repository types
pub use repository::{
    get_or_create, ConversationStore, ConversationsRepositories, FindOrCreate,
    InMemoryConversationStore, MessageStore, PgConversationRepository, PgMessageRepository,
};

// Re-export service and API types
pub use api::routes;
pub use api::ConversationsState;
pub use service::ConversationService;
