//! Key alias lists probed by the normalizers.
//!
//! Order matters: the first alias holding a usable value wins.

/// Wrapper keys that may hold a list of chat entries.
pub const ENTRY_LIST_KEYS: &[&str] = &["response", "responses", "messages", "history", "data"];

/// Session identifier aliases.
pub const SESSION_ID_KEYS: &[&str] = &["session_id", "sessionId", "id", "pk", "identifier"];
/// Session display-name aliases.
pub const SESSION_NAME_KEYS: &[&str] = &["session_name", "sessionName", "name", "title", "label"];
/// Session document-collection aliases.
pub const SESSION_DOCUMENT_KEYS: &[&str] =
    &["documents", "files", "session_documents", "docs", "items", "sources"];
/// Wrapper keys that may hold a list of sessions.
pub const SESSION_LIST_KEYS: &[&str] = &["sessions", "data", "results", "items", "records"];
/// Key holding the legacy `[id, name, ...]` session tuples.
pub const LEGACY_SESSION_DATA_KEY: &str = "session_data";

/// Document identifier aliases.
pub const DOCUMENT_ID_KEYS: &[&str] =
    &["document_id", "documentId", "id", "file_id", "fileId", "pk"];
/// Document title aliases.
pub const DOCUMENT_TITLE_KEYS: &[&str] = &[
    "document_title",
    "documentTitle",
    "title",
    "name",
    "filename",
    "file_name",
    "label",
];
/// Document upload-timestamp aliases.
pub const DOCUMENT_UPLOADED_AT_KEYS: &[&str] = &["created_at", "uploaded_at", "createdAt"];
/// Key holding document tuples in the documents-by-session payload.
pub const DOCUMENT_ROWS_KEY: &str = "documents";

/// Message sender aliases.
pub const MESSAGE_SENDER_KEYS: &[&str] = &["sender", "role", "author"];
/// Message text aliases.
pub const MESSAGE_TEXT_KEYS: &[&str] = &["message", "text", "content", "body"];
/// Message identifier aliases.
pub const MESSAGE_ID_KEYS: &[&str] = &["id", "message_id", "messageId", "pk", "uuid"];
/// Message timestamp aliases.
pub const MESSAGE_TIMESTAMP_KEYS: &[&str] = &["created_at", "timestamp", "createdAt"];

/// Sender strings classified as the user.
pub const USER_SENDERS: &[&str] = &["user", "human", "you", "student"];
/// Sender strings classified as the assistant.
pub const ASSISTANT_SENDERS: &[&str] = &["assistant", "bot", "ai", "tutor"];

/// Keys that may hold the per-session collection in a bulk history payload.
pub const HISTORY_SESSION_KEYS: &[&str] = &["sessions", "session_history", "histories"];
/// Fallback wrapper keys for the bulk history payload.
pub const HISTORY_FALLBACK_KEYS: &[&str] = &["data", "results", "items"];
/// Session-name aliases inside a bulk history entry (no `label`).
pub const HISTORY_NAME_KEYS: &[&str] = &["session_name", "sessionName", "name", "title"];
/// Message-collection aliases inside a bulk history entry.
pub const HISTORY_MESSAGE_KEYS: &[&str] = &["messages", "history", "entries", "response"];

/// Keys that may hold the assistant's answer.
pub const ANSWER_KEYS: &[&str] = &["response", "answer", "reply", "data", "result"];

/// Wrapper keys that may hold a list of flashcards.
pub const FLASHCARD_LIST_KEYS: &[&str] = &["flashcards", "cards", "data", "items"];
/// Flashcard question aliases.
pub const FLASHCARD_QUESTION_KEYS: &[&str] = &["question", "front", "prompt", "q", "term", "card"];
/// Flashcard answer aliases.
pub const FLASHCARD_ANSWER_KEYS: &[&str] =
    &["answer", "back", "response", "a", "definition", "explanation"];

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_aliases_are_ordered() {
        assert_eq!(
            SESSION_ID_KEYS,
            &["session_id", "sessionId", "id", "pk", "identifier"]
        );
        assert_eq!(
            SESSION_NAME_KEYS,
            &["session_name", "sessionName", "name", "title", "label"]
        );
        assert_eq!(
            SESSION_DOCUMENT_KEYS,
            &["documents", "files", "session_documents", "docs", "items", "sources"]
        );
    }

    #[test]
    fn document_aliases_are_ordered() {
        assert_eq!(
            DOCUMENT_ID_KEYS,
            &["document_id", "documentId", "id", "file_id", "fileId", "pk"]
        );
        assert_eq!(DOCUMENT_TITLE_KEYS.first(), Some(&"document_title"));
        assert_eq!(DOCUMENT_TITLE_KEYS.last(), Some(&"label"));
        assert_eq!(DOCUMENT_UPLOADED_AT_KEYS, &["created_at", "uploaded_at", "createdAt"]);
    }

    #[test]
    fn message_aliases_are_ordered() {
        assert_eq!(MESSAGE_SENDER_KEYS, &["sender", "role", "author"]);
        assert_eq!(MESSAGE_TEXT_KEYS, &["message", "text", "content", "body"]);
        assert_eq!(MESSAGE_ID_KEYS, &["id", "message_id", "messageId", "pk", "uuid"]);
        assert_eq!(MESSAGE_TIMESTAMP_KEYS, &["created_at", "timestamp", "createdAt"]);
    }

    #[test]
    fn wrapper_keys_are_ordered() {
        assert_eq!(
            ENTRY_LIST_KEYS,
            &["response", "responses", "messages", "history", "data"]
        );
        assert_eq!(ANSWER_KEYS, &["response", "answer", "reply", "data", "result"]);
        assert_eq!(FLASHCARD_LIST_KEYS, &["flashcards", "cards", "data", "items"]);
    }

    #[test]
    fn sender_vocabularies_do_not_overlap() {
        for sender in USER_SENDERS {
            assert!(!ASSISTANT_SENDERS.contains(sender));
        }
    }

    #[test]
    fn history_names_exclude_label() {
        assert!(!HISTORY_NAME_KEYS.contains(&"label"));
        assert!(SESSION_NAME_KEYS.contains(&"label"));
    }
}
