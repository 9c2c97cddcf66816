//! The canonical conversation collection

use crate::session::conversation::Conversation;
use crate::session::message::Message;

/// Owns the conversation list, always sorted by recency
///
/// Every mutating call leaves the collection sorted by `last_activity`
/// descending. The sort is stable, so conversations with equal timestamps
/// keep their relative order.
#[derive(Debug, Default)]
pub struct SessionStore {
    conversations: Vec<Conversation>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            conversations: Vec::new(),
        }
    }

    /// Allocate a new, empty conversation at the head of the collection
    ///
    /// Titles are a simple counter over the current conversation count;
    /// they are never derived from message content.
    pub fn create_conversation(&mut self) -> &Conversation {
        let title = format!("Conversation {}", self.conversations.len() + 1);
        let conversation = Conversation::new(title);
        tracing::info!(
            "Created conversation {} ({})",
            conversation.title,
            conversation.id
        );
        self.conversations.insert(0, conversation);
        self.sort_by_recency();
        // The new conversation has the newest timestamp and started at the
        // head, so the stable sort leaves it at index 0.
        &self.conversations[0]
    }

    /// Remove a conversation; no error if the id is unknown
    pub fn delete_conversation(&mut self, id: &str) {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        if self.conversations.len() < before {
            tracing::info!("Deleted conversation {}", id);
        }
    }

    /// Replace a conversation's message history
    ///
    /// Recomputes the aggregate sentiment, refreshes `last_activity` and
    /// re-sorts the collection. No-op for unknown ids.
    pub fn update_conversation(&mut self, id: &str, messages: Vec<Message>) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
            conversation.set_messages(messages);
            self.sort_by_recency();
        }
    }

    /// Look up a conversation by id
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// All conversations, most recently active first
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Number of conversations
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversations
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn sort_by_recency(&mut self) {
        self.conversations
            .sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    }
}
