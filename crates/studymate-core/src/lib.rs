//! # studymate-core
//!
//! Domain records and shape normalization for the StudyMate client.
//!
//! The backend behind the client has no stable response contract, so every
//! payload is treated as an untyped [`serde_json::Value`] and coerced into a
//! small set of canonical records:
//!
//! - **Records**: [`ChatMessage`], [`SessionSummary`], [`SessionDocument`],
//!   [`Flashcard`], [`SessionChatHistory`]
//! - **Normalizers**: ordered alias probing over JSON objects, tolerant numeric
//!   coercion, legacy tuple encodings ([`normalize`])
//! - **Flashcard mining**: a strategy cascade that recovers question/answer
//!   pairs from free-form assistant text ([`flashcards`])
//!
//! Normalization is total. Nothing in this crate returns an error for a
//! malformed payload: callers get `None` or an empty collection and decide
//! whether that is a failure or a skipped record.

#![deny(unsafe_code)]

pub mod constants;
pub mod flashcards;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod timestamps;
pub mod value;

pub use flashcards::{
    MAX_FLASHCARDS, PREVIEW_CHARS, normalize_flashcards_from_unknown, parse_flashcards_response,
};
pub use logging::LogLevel;
pub use models::{
    ChatMessage, ChatSender, Flashcard, SessionChatHistory, SessionDocument, SessionSummary,
};
