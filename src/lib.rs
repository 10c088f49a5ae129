//! Ask Gemini questions from a terminal menu.
//!
//! The crate is three pieces: a [`CredentialStore`] holding the API token,
//! a [`Conversation`] that keeps the transcript and one remote chat, and the
//! [`shell`] that drives both from modal prompts. The remote chat is reached
//! through the [`ChatBackend`] trait; [`GeminiBackend`] implements it over
//! the Gemini REST API.

// Public modules
pub mod backend;
pub mod client;
pub mod client_logger;
pub mod credential;
pub mod error;
pub mod observability;
pub mod session;
pub mod shell;
pub mod types;

// Re-exports
pub use backend::{ChatBackend, ChatHandle, GeminiBackend, GeminiChat};
pub use client::{API_KEY_ENV, Gemini};
pub use client_logger::{ClientLogger, StderrLogger};
pub use credential::{Credential, CredentialStore};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use session::{Answer, Conversation, ConversationStats, Transcript, Turn};
pub use types::*;
