//! Main TUI application state and logic

use crate::client::{ChatClient, ChatError, ChatReply};
use crate::controller::{SessionController, Submission};
use crate::session::SessionStore;

/// Outcome of one background analysis request
type SubmissionOutcome = (Submission, Result<ChatReply, ChatError>);

/// Application state
pub struct App {
    /// Session controller owning the conversation store
    pub controller: SessionController,
    /// Client for the analysis backend
    pub client: ChatClient,
    /// Should quit
    pub should_quit: bool,
    /// Requests still running on background threads
    pending: Vec<std::thread::JoinHandle<SubmissionOutcome>>,
}

impl App {
    /// Create a new application talking to the backend at `base_url`
    pub fn new(base_url: &str) -> crate::Result<Self> {
        Ok(Self {
            controller: SessionController::new(SessionStore::new()),
            client: ChatClient::new(base_url)?,
            should_quit: false,
            pending: Vec::new(),
        })
    }

    /// Submit the input buffer to the analysis service
    ///
    /// The request runs on a background thread with its own runtime so the
    /// UI thread never blocks; `poll_submissions` reconciles the result.
    /// Switching conversations while a request is outstanding is fine: the
    /// submission carries its target conversation id.
    pub fn send_message(&mut self) {
        let Some(submission) = self.controller.begin_submission() else {
            return;
        };

        let client = self.client.clone();
        let handle = std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            let result = rt.block_on(client.send(&submission.message, &submission.history));
            (submission, result)
        });
        self.pending.push(handle);
    }

    /// Poll background requests and reconcile any that finished
    ///
    /// Returns true if at least one submission was reconciled this call.
    pub fn poll_submissions(&mut self) -> bool {
        let mut reconciled = false;
        let mut still_pending = Vec::new();

        for handle in self.pending.drain(..) {
            if !handle.is_finished() {
                still_pending.push(handle);
                continue;
            }
            match handle.join() {
                Ok((submission, Ok(reply))) => {
                    self.controller.resolve_submission(submission, &reply);
                    reconciled = true;
                }
                Ok((submission, Err(error))) => {
                    self.controller.fail_submission(submission, &error);
                    reconciled = true;
                }
                Err(_) => {
                    tracing::error!("Analysis worker thread panicked");
                }
            }
        }

        self.pending = still_pending;
        reconciled
    }

    /// Create a conversation and make it active
    pub fn new_conversation(&mut self) {
        self.controller.create_conversation();
    }

    /// Delete the active conversation
    pub fn delete_active_conversation(&mut self) {
        if let Some(id) = self.controller.active_conversation_id().map(str::to_string) {
            self.controller.delete_conversation(&id);
        }
    }

    /// Switch to the next conversation in sidebar order
    pub fn next_conversation(&mut self) {
        self.step_conversation(1);
    }

    /// Switch to the previous conversation in sidebar order
    pub fn previous_conversation(&mut self) {
        self.step_conversation(-1);
    }

    /// Append a typed character to the input buffer
    pub fn push_input_char(&mut self, c: char) {
        let mut input = self.controller.input().to_string();
        input.push(c);
        self.controller.update_input(input);
    }

    /// Remove the last character from the input buffer
    pub fn pop_input_char(&mut self) {
        let mut input = self.controller.input().to_string();
        input.pop();
        self.controller.update_input(input);
    }

    fn step_conversation(&mut self, step: isize) {
        let conversations = self.controller.conversations();
        if conversations.is_empty() {
            return;
        }
        let len = conversations.len() as isize;
        let next = match self
            .controller
            .active_conversation_id()
            .and_then(|id| conversations.iter().position(|c| c.id == id))
        {
            Some(index) => (index as isize + step).rem_euclid(len),
            None => 0,
        };
        let id = conversations[next as usize].id.clone();
        self.controller.switch_conversation(&id);
    }
}
