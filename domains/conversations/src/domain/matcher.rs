//! Exact participant-set matching
//!
//! A candidate matches a target set only when both sets are equal: same
//! cardinality and every target id present. Overlap, subset, and superset
//! never match, so a group conversation {A, B, C} is never reused for a
//! request {A, B}.

use uuid::Uuid;

use crate::domain::entities::{ConversationWithParticipants, ParticipantSet};

/// Whether `candidate` has exactly the participants in `target`
pub fn is_exact_match(candidate: &ConversationWithParticipants, target: &ParticipantSet) -> bool {
    let ids = candidate.participant_ids();
    ids.len() == target.len() && target.iter().all(|id| ids.contains(id))
}

/// Find the conversation whose participant set equals `target`.
///
/// The store guarantees at most one such conversation. Should more than one
/// be passed in, the first is returned and the violation is logged.
pub fn find_exact_match(
    candidates: &[ConversationWithParticipants],
    target: &ParticipantSet,
) -> Option<Uuid> {
    let mut matches = candidates.iter().filter(|c| is_exact_match(c, target));
    let first = matches.next()?;

    let extra = matches.count();
    if extra > 0 {
        tracing::error!(
            conversation_id = %first.id(),
            participant_key = %target.canonical_key(),
            duplicates = extra,
            "Multiple conversations share one participant set"
        );
    }

    Some(first.id())
}
