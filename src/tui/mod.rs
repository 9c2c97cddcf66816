//! TUI (Terminal User Interface) module
//!
//! This module contains all TUI logic separated from the binary for better
//! testability. The TUI is a thin presentation layer: it renders read-only
//! snapshots from the session controller and forwards user intents to it,
//! never reaching into controller internals.

pub mod app;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
