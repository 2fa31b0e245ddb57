//! Session document normalization.

use serde_json::Value;

use crate::constants::{
    DOCUMENT_ID_KEYS, DOCUMENT_ROWS_KEY, DOCUMENT_TITLE_KEYS, DOCUMENT_UPLOADED_AT_KEYS,
};
use crate::models::SessionDocument;
use crate::value::{probe, probe_str, to_id};

/// Normalize one document entry.
///
/// A bare string is the title, with `fallback_id` as its id. An object
/// probes the id, title, and upload-timestamp aliases; a missing or invalid
/// id falls back to `fallback_id`, and a non-string title becomes
/// `File <id>`. Anything else is not a document.
pub fn normalize_document(raw: &Value, fallback_id: i64) -> Option<SessionDocument> {
    match raw {
        Value::String(title) => Some(SessionDocument::titled(fallback_id, title.as_str())),
        Value::Object(record) => {
            let id = probe(record, DOCUMENT_ID_KEYS)
                .and_then(to_id)
                .unwrap_or(fallback_id);
            let title = match probe(record, DOCUMENT_TITLE_KEYS) {
                Some(Value::String(title)) => title.clone(),
                _ => format!("File {id}"),
            };
            let uploaded_at = probe_str(record, DOCUMENT_UPLOADED_AT_KEYS).map(str::to_string);
            Some(SessionDocument {
                id,
                title,
                uploaded_at,
            })
        }
        _ => None,
    }
}

/// Collect documents from an array or from the values of an object.
///
/// Fallback ids are 1-based source positions.
pub fn collect_documents(raw: Option<&Value>) -> Vec<SessionDocument> {
    let items: Vec<&Value> = match raw {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(record)) => record.values().collect(),
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .zip(1_i64..)
        .filter_map(|(item, position)| normalize_document(item, position))
        .collect()
}

/// Normalize the documents-by-session payload: `{"documents": [[title, ...], ...]}`.
///
/// Only rows whose first element is a string count. Ids are assigned from 1
/// in order of the accepted rows.
pub fn normalize_document_rows(payload: &Value) -> Vec<SessionDocument> {
    let Some(rows) = payload.get(DOCUMENT_ROWS_KEY).and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| row.as_array()?.first()?.as_str())
        .zip(1_i64..)
        .map(|(title, id)| SessionDocument::titled(id, title))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
