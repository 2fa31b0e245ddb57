//! Request descriptors and logical operations.

use std::fmt;

use serde_json::Value;

/// HTTP method of a candidate request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST` with a JSON body.
    Post,
}

impl HttpMethod {
    /// Whether repeating the request has no side effects.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Get)
    }

    /// Method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete request tried for a logical operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// JSON body (POST only).
    pub body: Option<Value>,
}

impl Candidate {
    /// `GET` candidate.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    /// `POST` candidate with a JSON body.
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Logical operation served by a list of candidates.
///
/// Only used for diagnostics: the headline of the aggregated error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Chat history of one session.
    ChatHistory,
    /// Chat histories of every session of a user.
    ChatHistoriesForUser,
    /// Ask the assistant a question.
    AskQuestion,
    /// Sessions of a user.
    Sessions,
    /// Create a session.
    CreateSession,
    /// Generated flashcards of a session.
    Flashcards,
}

impl Operation {
    /// Human-readable description used as the error headline.
    pub fn headline(self) -> &'static str {
        match self {
            Self::ChatHistory | Self::ChatHistoriesForUser => "Unable to load chat history",
            Self::AskQuestion => "Unable to get an answer from the server",
            Self::Sessions => "Unable to load sessions",
            Self::CreateSession => "Unable to create session",
            Self::Flashcards => "Unable to load flashcards",
        }
    }

    /// Separator between the headline and the per-candidate lines.
    pub(crate) fn detail_separator(self) -> &'static str {
        match self {
            Self::AskQuestion => ":",
            _ => ". Tried endpoints:",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChatHistory => "chat_history",
            Self::ChatHistoriesForUser => "chat_histories_for_user",
            Self::AskQuestion => "ask_question",
            Self::Sessions => "sessions",
            Self::CreateSession => "create_session",
            Self::Flashcards => "flashcards",
        };
        f.write_str(name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors() {
        let get = Candidate::get("http://x/a");
        assert_eq!(get.method, HttpMethod::Get);
        assert!(get.body.is_none());

        let post = Candidate::post("http://x/b", json!({"k": 1}));
        assert_eq!(post.method, HttpMethod::Post);
        assert_eq!(post.body, Some(json!({"k": 1})));
    }

    #[test]
    fn only_get_is_idempotent() {
        assert!(HttpMethod::Get.is_idempotent());
        assert!(!HttpMethod::Post.is_idempotent());
    }

    #[test]
    fn headlines() {
        assert_eq!(Operation::Sessions.headline(), "Unable to load sessions");
        assert_eq!(Operation::CreateSession.headline(), "Unable to create session");
        assert_eq!(
            Operation::ChatHistoriesForUser.headline(),
            Operation::ChatHistory.headline()
        );
        assert_eq!(Operation::AskQuestion.detail_separator(), ":");
        assert_eq!(Operation::Sessions.detail_separator(), ". Tried endpoints:");
    }
}
