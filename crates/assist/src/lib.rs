//! Generation relay client.
//!
//! Blocking reqwest client (no Tokio runtime required). Sends a prompt plus
//! the document's column titles to a chat-completion relay and turns the
//! reply into a [`GenerationSuggestion`](taskgrid_engine::GenerationSuggestion).

pub mod client;
pub mod prompt;

pub use client::{AssistError, RelayClient};
