//! Literal candidate tables.
//!
//! The backend has moved its routes around over time; each operation keeps
//! every known variant, in the order they are tried. Paths are appended to
//! the base URL verbatim, trailing slashes included.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value, json};

use crate::candidate::Candidate;

/// Characters escaped in a URI component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query value the way browsers encode a URI component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

fn get_all(base_url: &str, paths: &[String]) -> Vec<Candidate> {
    paths
        .iter()
        .map(|path| Candidate::get(format!("{base_url}{path}")))
        .collect()
}

/// Chat history of one session.
pub fn chat_history(base_url: &str, session_id: i64) -> Vec<Candidate> {
    get_all(
        base_url,
        &[
            format!("/retrieveChatHistory/?session_id={session_id}"),
            format!("/retrieveChatHistory?session_id={session_id}"),
            format!("/sessions/{session_id}/history"),
            format!("/api/sessions/{session_id}/history"),
        ],
    )
}

/// Chat histories of every session of a user.
pub fn chat_histories_for_user(base_url: &str, user_id: i64) -> Vec<Candidate> {
    get_all(
        base_url,
        &[
            format!("/retrieveChatHistory/?user_id={user_id}"),
            format!("/retrieveChatHistory?user_id={user_id}"),
        ],
    )
}

/// Ask a question: JSON `POST` variants first, then query-string `GET`s.
pub fn ask_question(base_url: &str, session_id: i64, question: &str) -> Vec<Candidate> {
    let body = json!({ "session_id": session_id, "question": question });
    let posts = [
        "/ask/".to_string(),
        "/ask".to_string(),
        "/api/ask/".to_string(),
        "/api/ask".to_string(),
        format!("/sessions/{session_id}/ask"),
    ];

    let encoded = encode_component(question);
    let query = format!("session_id={session_id}&question={encoded}");
    let gets = [
        format!("/ask/?{query}"),
        format!("/ask?{query}"),
        format!("/api/ask/?{query}"),
        format!("/api/ask?{query}"),
    ];

    posts
        .iter()
        .map(|path| Candidate::post(format!("{base_url}{path}"), body.clone()))
        .chain(get_all(base_url, &gets))
        .collect()
}

/// Sessions of a user.
pub fn sessions(base_url: &str, user_id: i64) -> Vec<Candidate> {
    get_all(
        base_url,
        &[
            format!("/getSessionsByUserId?user_id={user_id}"),
            format!("/sessions/?user_id={user_id}"),
            format!("/sessions?user_id={user_id}"),
            format!("/api/sessions/?user_id={user_id}"),
            format!("/api/sessions?user_id={user_id}"),
            format!("/user-sessions/?user_id={user_id}"),
            format!("/user-sessions?user_id={user_id}"),
            format!("/user/{user_id}/sessions"),
            format!("/getSessions/?user_id={user_id}"),
            format!("/getSessions?user_id={user_id}"),
        ],
    )
}

/// Body of a create-session request. A blank name is omitted.
pub fn create_session_body(user_id: i64, name: Option<&str>) -> Value {
    match name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => json!({ "user_id": user_id, "session_name": name }),
        None => json!({ "user_id": user_id }),
    }
}

/// Create a session.
pub fn create_session(base_url: &str, user_id: i64, name: Option<&str>) -> Vec<Candidate> {
    let body = create_session_body(user_id, name);
    ["/sessions/", "/sessions", "/api/sessions/", "/api/sessions"]
        .iter()
        .map(|path| Candidate::post(format!("{base_url}{path}"), body.clone()))
        .collect()
}

/// Generated flashcards of a session.
pub fn flashcards(base_url: &str, session_id: i64) -> Vec<Candidate> {
    get_all(
        base_url,
        &[
            format!("/generateFlashcards?session_id={session_id}"),
            format!("/generateFlashcards/?session_id={session_id}"),
        ],
    )
}

/// Document list of a session (single endpoint).
pub fn documents(base_url: &str, session_id: i64) -> String {
    format!("{base_url}/getDocumentsBySession?session_id={session_id}")
}

/// Multipart upload target.
pub fn upload(base_url: &str, user_id: i64, session_id: Option<i64>) -> String {
    match session_id {
        Some(session_id) => format!("{base_url}/upload/?user_id={user_id}&session_id={session_id}"),
        None => format!("{base_url}/upload/?user_id={user_id}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
