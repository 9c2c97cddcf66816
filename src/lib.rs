//! Solace - a sentiment-aware therapeutic chat client
//!
//! This library provides the core functionality for Solace: multiple
//! independent chat conversations with a remote analysis service, where each
//! user message is annotated with an emotion label/confidence and a sarcasm
//! judgment returned asynchronously by that service.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod controller;
pub mod sentiment;
pub mod session;
pub mod tui;

#[cfg(test)]
mod tests;

/// Result type alias for Solace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Solace operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Chat service error
    #[error("Chat error: {0}")]
    Chat(#[from] client::ChatError),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Initialize the Solace library with logging
pub fn init() {
    tracing_subscriber::fmt::init();
}
