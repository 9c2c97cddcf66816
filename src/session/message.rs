//! Message structures and sentiment annotation tracking

use crate::sentiment::{ANALYZING_LABEL, ERROR_LABEL};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the local user
    User,
    /// Message produced by the remote assistant
    Assistant,
}

/// Emotion and sarcasm judgment attached to a user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnnotation {
    /// Emotion label, or one of the `Analyzing...`/`Error` sentinels
    pub emotion_label: String,
    /// Confidence in the emotion label, 0-100; meaningless while pending
    pub emotion_confidence: f64,
    /// Whether the message was judged sarcastic; meaningless while pending
    pub sarcasm_detected: bool,
    /// Explanation for the sarcasm judgment; meaningful only when detected
    pub sarcasm_reason: String,
    /// True from message creation until the service responds or errors
    pub pending: bool,
}

impl SentimentAnnotation {
    /// Annotation for a freshly submitted message awaiting analysis
    pub fn analyzing() -> Self {
        Self {
            emotion_label: ANALYZING_LABEL.to_string(),
            emotion_confidence: 0.0,
            sarcasm_detected: false,
            sarcasm_reason: ANALYZING_LABEL.to_string(),
            pending: true,
        }
    }

    /// Annotation carrying the service's resolved judgment
    pub fn resolved(
        emotion_label: impl Into<String>,
        emotion_confidence: f64,
        sarcasm_detected: bool,
        sarcasm_reason: impl Into<String>,
    ) -> Self {
        Self {
            emotion_label: emotion_label.into(),
            emotion_confidence,
            sarcasm_detected,
            sarcasm_reason: sarcasm_reason.into(),
            pending: false,
        }
    }

    /// Annotation for a message whose analysis request failed
    ///
    /// Prior partial fields are discarded; the message shows the `Error`
    /// sentinel instead of staying pending forever.
    pub fn failed() -> Self {
        Self {
            emotion_label: ERROR_LABEL.to_string(),
            emotion_confidence: 0.0,
            sarcasm_detected: false,
            sarcasm_reason: "Analysis failed".to_string(),
            pending: false,
        }
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    pub id: String,
    /// Message text, immutable once created
    pub content: String,
    /// Author role
    pub role: Role,
    /// Sentiment annotation; present only on user messages
    #[serde(default)]
    pub sentiment: Option<SentimentAnnotation>,
}

impl Message {
    /// Create a user message with a pending annotation
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: format!("user-{}", Uuid::new_v4()),
            content: content.into(),
            role: Role::User,
            sentiment: Some(SentimentAnnotation::analyzing()),
        }
    }

    /// Create an assistant message (assistant turns carry no annotation)
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: format!("assistant-{}", Uuid::new_v4()),
            content: content.into(),
            role: Role::Assistant,
            sentiment: None,
        }
    }

    /// Replace the pending annotation with the service's judgment
    ///
    /// Only user messages carry annotations; calling this on an assistant
    /// message does nothing.
    pub fn resolve_analysis(&mut self, annotation: SentimentAnnotation) {
        if self.role == Role::User {
            self.sentiment = Some(annotation);
        }
    }

    /// Degrade the pending annotation to the error state
    pub fn fail_analysis(&mut self) {
        if self.role == Role::User {
            self.sentiment = Some(SentimentAnnotation::failed());
        }
    }

    /// Whether this message still awaits its analysis result
    pub fn is_pending(&self) -> bool {
        self.sentiment.as_ref().is_some_and(|s| s.pending)
    }
}
