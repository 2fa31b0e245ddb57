//! Canonical domain records.
//!
//! These are what the normalizers produce and what the UI consumes. Records
//! are replaced wholesale, never patched in place. Serialized field names are
//! camelCase to match the wire format the front-end expects.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// Author of a chat message.
///
/// A closed set: sender strings that match neither vocabulary collapse into
/// [`ChatSender::Assistant`] (see [`crate::normalize::messages::classify_sender`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant.
    Assistant,
}

impl ChatSender {
    /// Wire name (`"user"` or `"assistant"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a session's chat history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Source id, or a synthetic `line-<index>`.
    pub id: String,
    /// Author.
    pub sender: ChatSender,
    /// Message body.
    pub text: String,
    /// Raw timestamp string as sent by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Chat history for one session, used when loading many sessions at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChatHistory {
    /// Session identifier.
    pub session_id: i64,
    /// Display name (`Session <id>` when the source has none).
    pub session_name: String,
    /// Messages in source order.
    pub messages: Vec<ChatMessage>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions and documents
// ─────────────────────────────────────────────────────────────────────────────

/// A document attached to a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    /// Source id, or the 1-based position in the source list.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Upload timestamp, if the source carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

impl SessionDocument {
    /// Document with no upload timestamp.
    pub fn titled(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            uploaded_at: None,
        }
    }
}

/// A study session and its documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session identifier. Mandatory: records without one are dropped.
    pub id: i64,
    /// Display name (`Session <id>` when absent or blank).
    pub name: String,
    /// Attached documents.
    pub documents: Vec<SessionDocument>,
}

/// Display name used when a session has none.
pub fn default_session_name(id: i64) -> String {
    format!("Session {id}")
}

// ─────────────────────────────────────────────────────────────────────────────
// Flashcards
// ─────────────────────────────────────────────────────────────────────────────

/// A question/answer study card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Source id, or a deterministic `card-<n>`.
    pub id: String,
    /// Front of the card.
    pub question: String,
    /// Back of the card.
    pub answer: String,
}

impl Flashcard {
    /// Build a card, trimming both sides.
    ///
    /// Returns `None` unless both question and answer are non-empty: there
    /// are no partial cards.
    pub fn new(id: impl Into<String>, question: &str, answer: &str) -> Option<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            id: id.into(),
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
