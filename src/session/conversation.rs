//! Conversation metadata and derived sentiment

use crate::sentiment::{aggregate_sentiment, NEUTRAL_LABEL};
use crate::session::message::{Message, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One chat session with its own history and aggregate sentiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation ID, assigned at creation
    pub id: String,
    /// Human label, assigned at creation and never changed afterwards
    pub title: String,
    /// Messages in chronological (insertion) order
    pub messages: Vec<Message>,
    /// Most frequent resolved emotion label, or `"neutral"`
    pub overall_sentiment: String,
    /// Refreshed whenever `messages` changes; drives list ordering
    pub last_activity: DateTime<Utc>,
}

impl Conversation {
    /// Create a new, empty conversation
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            messages: Vec::new(),
            overall_sentiment: NEUTRAL_LABEL.to_string(),
            last_activity: Utc::now(),
        }
    }

    /// Replace the message history and recompute the derived fields
    ///
    /// The aggregate sentiment is recomputed from scratch on every call;
    /// conversations are small enough that incremental maintenance is not
    /// worth the drift risk.
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.overall_sentiment = aggregate_sentiment(&messages);
        self.messages = messages;
        self.last_activity = Utc::now();
    }

    /// First user message, truncated for list previews
    pub fn preview(&self) -> String {
        match self.messages.iter().find(|m| m.role == Role::User) {
            Some(message) => {
                let truncated: String = message.content.chars().take(30).collect();
                if message.content.chars().count() > 30 {
                    format!("{}...", truncated)
                } else {
                    truncated
                }
            }
            None => "New chat".to_string(),
        }
    }
}
