//! Conversation-level sentiment aggregation
//!
//! Pure functions that derive a conversation's overall sentiment from the
//! per-message emotion labels attached by the analysis service. Stateless
//! and side-effect-free; the store recomputes the aggregate on every
//! message-list mutation rather than maintaining it incrementally.

use crate::session::{Message, Role};
use std::collections::HashMap;

/// Label shown on a message while its analysis is still outstanding
pub const ANALYZING_LABEL: &str = "Analyzing...";

/// Label attached to a message whose analysis request failed
pub const ERROR_LABEL: &str = "Error";

/// Aggregate label for conversations without any resolved emotion
pub const NEUTRAL_LABEL: &str = "neutral";

/// Labels that never count toward the aggregate
fn is_transient(label: &str) -> bool {
    label.is_empty() || label == ANALYZING_LABEL || label == ERROR_LABEL
}

/// Compute the overall sentiment of a message list
///
/// Returns the most frequent resolved emotion label among the user messages;
/// pending annotations and the `Analyzing...`/`Error` sentinels never count.
/// Ties go to the first label (in message order) that reached the winning
/// count, so the result does not depend on map iteration order. Returns
/// `"neutral"` when nothing counts.
pub fn aggregate_sentiment(messages: &[Message]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best: Option<(&str, usize)> = None;

    for message in messages {
        if message.role != Role::User {
            continue;
        }
        let Some(annotation) = &message.sentiment else {
            continue;
        };
        if annotation.pending || is_transient(&annotation.emotion_label) {
            continue;
        }

        let count = counts
            .entry(annotation.emotion_label.as_str())
            .and_modify(|c| *c += 1)
            .or_insert(1);

        // Strictly-greater replacement keeps the first label that reached
        // the winning count.
        match best {
            Some((_, best_count)) if *count <= best_count => {}
            _ => best = Some((annotation.emotion_label.as_str(), *count)),
        }
    }

    match best {
        Some((label, _)) => label.to_string(),
        None => NEUTRAL_LABEL.to_string(),
    }
}
