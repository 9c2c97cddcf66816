//! Session state module
//!
//! This module owns the canonical conversation data model:
//! - `message` - Message structures and sentiment annotation tracking
//! - `conversation` - Conversation metadata and derived sentiment
//! - `store` - The conversation collection, kept sorted by recency
//!
//! All state lives in memory for the lifetime of the process; nothing is
//! persisted across restarts.

// Submodules
pub mod conversation;
pub mod message;
pub mod store;

// Re-export commonly used types
pub use conversation::Conversation;
pub use message::{Message, Role, SentimentAnnotation};
pub use store::SessionStore;
