//! Bulk chat-history normalization (all sessions of one user).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::constants::{
    HISTORY_FALLBACK_KEYS, HISTORY_MESSAGE_KEYS, HISTORY_NAME_KEYS, HISTORY_SESSION_KEYS,
    SESSION_ID_KEYS,
};
use crate::models::{SessionChatHistory, default_session_name};
use crate::normalize::messages::{extract_entries, normalize_messages};
use crate::value::{probe, to_id};

/// Locate the per-session records in a bulk history payload.
///
/// The first present value under `sessions`, `session_history`, or
/// `histories` is used when it is an array or an object (its values). If
/// that fails, the first array under `data`, `results`, or `items` wins. A
/// bare top-level array is not recognized.
pub fn extract_session_entries(payload: &Value) -> Option<Vec<&Value>> {
    let record = payload.as_object()?;
    match probe(record, HISTORY_SESSION_KEYS) {
        Some(Value::Array(items)) => return Some(items.iter().collect()),
        Some(Value::Object(by_id)) => return Some(by_id.values().collect()),
        _ => {}
    }
    HISTORY_FALLBACK_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_array))
        .map(|items| items.iter().collect())
}

/// Normalize one session's history record.
///
/// Requires a valid session id. Messages come from the first present
/// message alias; a non-array value there is searched for an entry list.
pub fn normalize_session_history(raw: &Value) -> Option<SessionChatHistory> {
    let record = raw.as_object()?;
    let session_id = probe(record, SESSION_ID_KEYS).and_then(to_id)?;
    let session_name = match probe(record, HISTORY_NAME_KEYS) {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => default_session_name(session_id),
    };
    let messages = match probe(record, HISTORY_MESSAGE_KEYS) {
        Some(Value::Array(entries)) => normalize_messages(entries),
        Some(other) => extract_entries(other).map(normalize_messages).unwrap_or_default(),
        None => Vec::new(),
    };
    Some(SessionChatHistory {
        session_id,
        session_name,
        messages,
    })
}

/// Normalize a bulk history payload, keyed by session id.
///
/// The first record for a session id wins; later duplicates are ignored.
/// Returns `None` when the payload shape is not recognized.
pub fn collect_session_histories(payload: &Value) -> Option<BTreeMap<i64, SessionChatHistory>> {
    let entries = extract_session_entries(payload)?;
    let mut histories = BTreeMap::new();
    for history in entries.into_iter().filter_map(normalize_session_history) {
        let _ = histories.entry(history.session_id).or_insert(history);
    }
    Some(histories)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
