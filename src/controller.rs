//! Active session controller
//!
//! Owns the transient state of whichever conversation is currently open and
//! orchestrates the optimistic-update -> network call -> reconciliation
//! cycle against the session store. The store is owned explicitly by the
//! controller; nothing here reaches into ambient state.
//!
//! Each submission runs through `Idle -> Submitting -> Resolved | Failed`:
//! `begin_submission` performs the optimistic append and captures the target
//! conversation id, `resolve_submission`/`fail_submission` reconcile the
//! result into that same conversation even if the user has switched away in
//! the meantime. At most one request can be outstanding per conversation.

use crate::client::{ChatClient, ChatError, ChatReply, HistoryMessage};
use crate::session::{Conversation, Message, SentimentAnnotation, SessionStore};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Working view of the conversation the user currently has open
///
/// Never owns conversation data long-term: after every mutation the working
/// copy is pushed back into the store, so the two only diverge for the
/// duration of one pending network call.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    /// Id of the open conversation
    pub conversation_id: String,
    /// Optimistic working copy of that conversation's messages
    pub working_messages: Vec<Message>,
    /// Text the user has typed but not yet submitted
    pub input_buffer: String,
}

/// One in-flight analysis request, captured at submission time
///
/// The target conversation id is fixed here, not re-read from the active
/// session at resolution time, so a reply that arrives after the user
/// switched conversations still lands in the right history.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Conversation the request belongs to
    pub conversation_id: String,
    /// Id of the optimistically appended user message
    pub message_id: String,
    /// The submitted text
    pub message: String,
    /// History snapshot sent alongside the message (excludes `message`)
    pub history: Vec<HistoryMessage>,
}

/// Orchestrates the store, the active session and in-flight requests
#[derive(Debug, Default)]
pub struct SessionController {
    store: SessionStore,
    active: Option<ActiveSession>,
    /// Conversation ids with an outstanding analysis request
    in_flight: HashSet<String>,
}

impl SessionController {
    /// Create a controller owning the given store
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            active: None,
            in_flight: HashSet::new(),
        }
    }

    /// All conversations, most recently active first
    pub fn conversations(&self) -> &[Conversation] {
        self.store.conversations()
    }

    /// Read-only access to the underlying store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Id of the open conversation, if any
    pub fn active_conversation_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.conversation_id.as_str())
    }

    /// Working copy of the open conversation's messages
    pub fn working_messages(&self) -> &[Message] {
        self.active
            .as_ref()
            .map(|a| a.working_messages.as_slice())
            .unwrap_or(&[])
    }

    /// Current input buffer contents
    pub fn input(&self) -> &str {
        self.active
            .as_ref()
            .map(|a| a.input_buffer.as_str())
            .unwrap_or("")
    }

    /// True while a request is outstanding for the active conversation
    ///
    /// Busy is per conversation, not global: switching to another
    /// conversation while one is waiting on the network leaves the new one
    /// free to submit.
    pub fn busy(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| self.in_flight.contains(&a.conversation_id))
    }

    /// Create a new conversation and make it the active session
    ///
    /// Returns the new conversation's id.
    pub fn create_conversation(&mut self) -> String {
        let id = self.store.create_conversation().id.clone();
        self.active = Some(ActiveSession {
            conversation_id: id.clone(),
            working_messages: Vec::new(),
            input_buffer: String::new(),
        });
        id
    }

    /// Open a conversation, loading its history into the working copy
    ///
    /// An unknown id yields an empty working copy. Never cancels an
    /// outstanding request for the previously active conversation.
    pub fn switch_conversation(&mut self, id: &str) {
        let working_messages = self
            .store
            .get(id)
            .map(|c| c.messages.clone())
            .unwrap_or_default();
        self.active = Some(ActiveSession {
            conversation_id: id.to_string(),
            working_messages,
            input_buffer: String::new(),
        });
        debug!("Switched active conversation to {}", id);
    }

    /// Delete a conversation; idempotent for unknown ids
    ///
    /// If the deleted conversation was active, the most recently active
    /// remaining conversation becomes active, else the session empties.
    pub fn delete_conversation(&mut self, id: &str) {
        self.store.delete_conversation(id);

        let was_active = self
            .active
            .as_ref()
            .is_some_and(|a| a.conversation_id == id);
        if was_active {
            self.active = None;
            if let Some(next_id) = self.store.conversations().first().map(|c| c.id.clone()) {
                self.switch_conversation(&next_id);
            }
        }
    }

    /// Replace the input buffer; ignored when no conversation is open
    pub fn update_input(&mut self, text: impl Into<String>) {
        if let Some(active) = &mut self.active {
            active.input_buffer = text.into();
        }
    }

    /// Start a submission for the active conversation
    ///
    /// Performs the optimistic half of the state machine: synthesizes the
    /// pending user message, appends it to the working copy, pushes the
    /// snapshot into the store and clears the input buffer. Returns `None`
    /// without any state change when the input is blank, no conversation is
    /// open, or a request is already outstanding for this conversation.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        let active = self.active.as_mut()?;
        if active.input_buffer.trim().is_empty() {
            return None;
        }
        if self.in_flight.contains(&active.conversation_id) {
            debug!(
                "Submission rejected: request already outstanding for {}",
                active.conversation_id
            );
            return None;
        }

        // History snapshot excludes the message being submitted.
        let history: Vec<HistoryMessage> = active
            .working_messages
            .iter()
            .map(HistoryMessage::from)
            .collect();

        let text = std::mem::take(&mut active.input_buffer);
        let message = Message::user(text.clone());
        let message_id = message.id.clone();
        active.working_messages.push(message);

        let submission = Submission {
            conversation_id: active.conversation_id.clone(),
            message_id,
            message: text,
            history,
        };
        let working = active.working_messages.clone();

        // Optimistic update: the stored history shows the pending message
        // before any network response arrives.
        self.store
            .update_conversation(&submission.conversation_id, working);
        self.in_flight.insert(submission.conversation_id.clone());

        info!(
            "Submitting message {} in conversation {}",
            submission.message_id, submission.conversation_id
        );
        Some(submission)
    }

    /// Reconcile a successful reply into the submission's conversation
    ///
    /// Replaces the pending annotation with the resolved judgment, appends
    /// the assistant reply, and pushes the result into the store (which
    /// re-aggregates and re-sorts). Consuming the submission enforces one
    /// reconciliation per request.
    pub fn resolve_submission(&mut self, submission: Submission, reply: &ChatReply) {
        self.in_flight.remove(&submission.conversation_id);

        let Some(conversation) = self.store.get(&submission.conversation_id) else {
            // Conversation deleted while the request was in flight.
            warn!(
                "Dropping reply for deleted conversation {}",
                submission.conversation_id
            );
            return;
        };

        let mut messages = conversation.messages.clone();
        if let Some(message) = messages.iter_mut().find(|m| m.id == submission.message_id) {
            message.resolve_analysis(SentimentAnnotation::resolved(
                reply.emotion.label.clone(),
                reply.emotion.confidence,
                reply.sarcasm.sarcastic,
                reply.sarcasm.reason.clone(),
            ));
        }
        messages.push(Message::assistant(reply.response.clone()));

        self.store
            .update_conversation(&submission.conversation_id, messages);
        self.refresh_working_copy(&submission.conversation_id);

        info!(
            "Resolved analysis for conversation {} (emotion: {})",
            submission.conversation_id, reply.emotion.label
        );
    }

    /// Reconcile a failed request into the submission's conversation
    ///
    /// The pending annotation degrades to the `Error` sentinel and the
    /// failure text lands in the transcript as a synthetic assistant
    /// message, so it is visible in the conversation rather than dropped.
    pub fn fail_submission(&mut self, submission: Submission, error: &ChatError) {
        self.in_flight.remove(&submission.conversation_id);

        let Some(conversation) = self.store.get(&submission.conversation_id) else {
            warn!(
                "Dropping failure for deleted conversation {}",
                submission.conversation_id
            );
            return;
        };

        let mut messages = conversation.messages.clone();
        if let Some(message) = messages.iter_mut().find(|m| m.id == submission.message_id) {
            message.fail_analysis();
        }
        messages.push(Message::assistant(format!(
            "Sorry, I encountered an error: {}",
            error
        )));

        self.store
            .update_conversation(&submission.conversation_id, messages);
        self.refresh_working_copy(&submission.conversation_id);

        warn!(
            "Analysis failed for conversation {}: {}",
            submission.conversation_id, error
        );
    }

    /// Submit the input buffer and wait for the reply
    ///
    /// Convenience for single-task callers: chains `begin_submission`, the
    /// network call and the matching reconciliation. Returns whether a
    /// request was actually issued. All failures are folded into the
    /// `Failed` transition; nothing propagates.
    pub async fn submit(&mut self, client: &ChatClient) -> bool {
        let Some(submission) = self.begin_submission() else {
            return false;
        };
        let result = client.send(&submission.message, &submission.history).await;
        match result {
            Ok(reply) => self.resolve_submission(submission, &reply),
            Err(error) => self.fail_submission(submission, &error),
        }
        true
    }

    /// Re-sync the working copy from the store after a reconciliation
    fn refresh_working_copy(&mut self, conversation_id: &str) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.conversation_id != conversation_id {
            return;
        }
        if let Some(conversation) = self.store.get(conversation_id) {
            active.working_messages = conversation.messages.clone();
        }
    }
}
