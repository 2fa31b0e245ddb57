//! Shape normalizers: untyped JSON in, canonical records out.
//!
//! Each submodule owns one entity. All of them follow the same rules:
//! ordered alias probing (see [`crate::constants`]), numeric tolerance for
//! identifiers, and `None`/empty results instead of errors.

pub mod answer;
pub mod documents;
pub mod histories;
pub mod messages;
pub mod sessions;

pub use answer::extract_answer;
pub use documents::{collect_documents, normalize_document, normalize_document_rows};
pub use histories::{collect_session_histories, extract_session_entries, normalize_session_history};
pub use messages::{
    classify_sender, extract_entries, normalize_message_entry, normalize_messages,
    sort_messages_by_timestamp,
};
pub use sessions::{
    DocumentLookup, legacy_session_rows, normalize_session, normalize_sessions,
    normalize_sessions_structured,
};
