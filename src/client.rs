//! Chat client for the remote analysis service
//!
//! Encapsulates the single `POST /api/chat` round trip: a user message plus
//! conversation history out, a reply with emotion and sarcasm judgments
//! back. The client issues exactly one request per call, never retries, and
//! never touches session state; all state transitions belong to the caller.

use crate::session::{Message, Role};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default address of the analysis backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Errors produced by a chat round trip
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The transport failed before any response arrived
    #[error("Could not connect to the assistant.")]
    Connect(#[source] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided detail, or a status-derived message
        detail: String,
    },

    /// The service answered with a success status but an unparsable body
    #[error("API Error: malformed response body")]
    InvalidResponse(#[source] reqwest::Error),
}

/// One history entry in the request payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Author role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl From<&Message> for HistoryMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Request body for `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The newly submitted user message
    pub message: String,
    /// Prior turns, oldest first; excludes `message` itself
    pub conversation_history: Vec<HistoryMessage>,
}

/// Sarcasm judgment in a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarcasmVerdict {
    /// Whether the submitted message was judged sarcastic
    pub sarcastic: bool,
    /// Free-text explanation for the judgment
    pub reason: String,
}

/// Emotion judgment in a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    /// Emotion label (e.g. "joy")
    pub label: String,
    /// Confidence in the label, 0-100
    pub confidence: f64,
}

/// Successful reply from `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The assistant's reply text
    pub response: String,
    /// Sarcasm judgment for the submitted message
    pub sarcasm: SarcasmVerdict,
    /// Emotion judgment for the submitted message
    pub emotion: EmotionScore,
}

/// Error body shape the backend uses for failure responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP client for the analysis service
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client for the given base URL
    ///
    /// No request timeout is configured: an outstanding analysis call runs
    /// to completion or transport failure, never to a local deadline.
    pub fn new(base_url: impl Into<String>) -> crate::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Send one user message plus conversation history
    ///
    /// Issues exactly one network round trip. Failures are returned as
    /// typed `ChatError`s carrying a human-readable description; the caller
    /// decides how to fold them into session state.
    pub async fn send(
        &self,
        message: &str,
        history: &[HistoryMessage],
    ) -> Result<ChatReply, ChatError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            message: message.to_string(),
            conversation_history: history.to_vec(),
        };

        info!("Sending chat message to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Chat request failed before a response: {}", e);
                ChatError::Connect(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => status_detail(status),
            };
            warn!("Chat request failed with status {}: {}", status, detail);
            return Err(ChatError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let reply = response.json::<ChatReply>().await.map_err(|e| {
            warn!("Chat reply body could not be parsed: {}", e);
            ChatError::InvalidResponse(e)
        })?;

        info!(
            "Chat reply received (emotion: {}, {:.0}%)",
            reply.emotion.label, reply.emotion.confidence
        );
        Ok(reply)
    }
}

/// Status-derived failure message used when no error body is parseable
pub(crate) fn status_detail(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("API Error: {} ({})", reason, status.as_u16()),
        None => format!("API Error: status {}", status.as_u16()),
    }
}
