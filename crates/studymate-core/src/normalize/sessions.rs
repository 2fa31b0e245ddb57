//! Session normalization.
//!
//! Sessions arrive either as structured records (possibly wrapped) or in
//! the legacy `session_data` tuple encoding. The legacy rows carry no
//! documents, so those are fetched per session through [`DocumentLookup`].

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use tracing::debug;

use crate::constants::{
    LEGACY_SESSION_DATA_KEY, SESSION_DOCUMENT_KEYS, SESSION_ID_KEYS, SESSION_LIST_KEYS,
    SESSION_NAME_KEYS,
};
use crate::models::{SessionDocument, SessionSummary, default_session_name};
use crate::normalize::documents::collect_documents;
use crate::value::{is_truthy, probe, to_id};

/// Source of per-session documents for the legacy tuple encoding.
///
/// Lookups are soft-fail: an implementation returns an empty list rather
/// than an error.
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    /// Documents attached to `session_id`.
    async fn documents_for_session(&self, session_id: i64) -> Vec<SessionDocument>;
}

/// Normalize a single structured session record.
///
/// The id is the only mandatory field; records without a valid one are
/// rejected. Ids must be whole numbers in the `i64` range, so a fractional
/// id such as `7.5` or `"7.5"` rejects the record. The name is trimmed and
/// falls back to `Session <id>` when it is missing, blank, or not a string.
pub fn normalize_session(raw: &Value) -> Option<SessionSummary> {
    let record = raw.as_object()?;
    let id = probe(record, SESSION_ID_KEYS).and_then(to_id)?;
    let name = match probe(record, SESSION_NAME_KEYS) {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => default_session_name(id),
    };
    let documents = collect_documents(probe(record, SESSION_DOCUMENT_KEYS));
    Some(SessionSummary {
        id,
        name,
        documents,
    })
}

fn normalize_all<'a>(items: impl IntoIterator<Item = &'a Value>) -> Vec<SessionSummary> {
    items
        .into_iter()
        .filter_map(|item| {
            let session = normalize_session(item);
            if session.is_none() {
                debug!(record = %item, "dropping session record without a valid id");
            }
            session
        })
        .collect()
}

/// Parse the legacy `session_data` rows into `(id, name)` pairs.
///
/// Each row is an array of at least two elements: `[id, name, ...]`. Rows
/// with an invalid id are skipped. A non-string name becomes
/// `Session <id>`; string names are kept as-is. Returns `None` when the
/// payload has no `session_data` array.
pub fn legacy_session_rows(payload: &Value) -> Option<Vec<(i64, String)>> {
    let rows = payload.get(LEGACY_SESSION_DATA_KEY)?.as_array()?;
    Some(
        rows.iter()
            .filter_map(|row| {
                let items = row.as_array().filter(|items| items.len() >= 2)?;
                let id = to_id(&items[0])?;
                let name = items[1]
                    .as_str()
                    .map_or_else(|| default_session_name(id), str::to_string);
                Some((id, name))
            })
            .collect(),
    )
}

/// Normalize a structured sessions payload (no legacy rows).
///
/// Tries, in order: a bare array, the first array under the wrapper keys,
/// and an object whose values are all objects, arrays, or `null`. Returns
/// `None` when the shape is not recognized.
pub fn normalize_sessions_structured(payload: &Value) -> Option<Vec<SessionSummary>> {
    match payload {
        Value::Array(items) => Some(normalize_all(items)),
        Value::Object(record) => {
            if let Some(items) = SESSION_LIST_KEYS
                .iter()
                .find_map(|key| record.get(*key).and_then(Value::as_array))
            {
                return Some(normalize_all(items));
            }
            let all_containers = record
                .values()
                .all(|value| matches!(value, Value::Object(_) | Value::Array(_) | Value::Null));
            if !record.is_empty() && all_containers {
                return Some(normalize_all(record.values()));
            }
            None
        }
        _ => None,
    }
}

/// Normalize any sessions payload.
///
/// A falsy payload is an empty list. Legacy rows are resolved first, with
/// one concurrent document lookup per session; if they produce no session
/// the structured shapes are tried instead.
pub async fn normalize_sessions(
    payload: &Value,
    lookup: &dyn DocumentLookup,
) -> Option<Vec<SessionSummary>> {
    if !is_truthy(payload) {
        return Some(Vec::new());
    }

    if let Some(rows) = legacy_session_rows(payload).filter(|rows| !rows.is_empty()) {
        debug!(count = rows.len(), "resolving legacy session rows");
        let lookups = rows.iter().map(|(id, _)| lookup.documents_for_session(*id));
        let documents = join_all(lookups).await;
        return Some(
            rows.into_iter()
                .zip(documents)
                .map(|((id, name), documents)| SessionSummary {
                    id,
                    name,
                    documents,
                })
                .collect(),
        );
    }

    normalize_sessions_structured(payload)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLookup {
        calls: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl DocumentLookup for RecordingLookup {
        async fn documents_for_session(&self, session_id: i64) -> Vec<SessionDocument> {
            self.calls.lock().unwrap().push(session_id);
            vec![SessionDocument::titled(1, format!("doc-for-{session_id}"))]
        }
    }

    // -- normalize_session --

    #[test]
    fn session_with_string_id() {
        let session = normalize_session(&json!({"id": "7", "name": "Bio"})).unwrap();
        assert_eq!(
            session,
            SessionSummary {
                id: 7,
                name: "Bio".into(),
                documents: vec![],
            }
        );
    }

    #[test]
    fn fractional_session_id_rejects_record() {
        assert_eq!(normalize_session(&json!({"id": 7.5, "name": "Bio"})), None);
        assert_eq!(normalize_session(&json!({"id": "7.5", "name": "Bio"})), None);
        let session = normalize_session(&json!({"id": 7.0, "name": "Bio"})).unwrap();
        assert_eq!(session.id, 7);
    }

    #[test]
    fn session_probes_aliases_in_order() {
        let session = normalize_session(&json!({
            "pk": 1,
            "sessionId": 2,
            "title": "Chemistry",
            "label": "ignored",
        }))
        .unwrap();
        assert_eq!(session.id, 2);
        assert_eq!(session.name, "Chemistry");
    }

    #[test]
    fn session_name_is_trimmed_or_defaulted() {
        let session = normalize_session(&json!({"id": 3, "name": "  Physics  "})).unwrap();
        assert_eq!(session.name, "Physics");
        let session = normalize_session(&json!({"id": 3, "name": "   "})).unwrap();
        assert_eq!(session.name, "Session 3");
        let session = normalize_session(&json!({"id": 3, "name": 99})).unwrap();
        assert_eq!(session.name, "Session 3");
    }

    #[test]
    fn session_documents_from_any_alias() {
        let session = normalize_session(&json!({
            "id": 1,
            "files": [{"id": 10, "title": "a.pdf"}, "b.pdf"],
        }))
        .unwrap();
        assert_eq!(session.documents.len(), 2);
        assert_eq!(session.documents[0].id, 10);
        assert_eq!(session.documents[1], SessionDocument::titled(2, "b.pdf"));
    }

    #[test]
    fn session_without_id_is_rejected() {
        assert!(normalize_session(&json!({"name": "Orphan"})).is_none());
        assert!(normalize_session(&json!({"id": "abc"})).is_none());
        assert!(normalize_session(&json!({"id": 1.5})).is_none());
        assert!(normalize_session(&json!([1, "x"])).is_none());
        assert!(normalize_session(&json!("7")).is_none());
    }

    // -- structured lists --

    #[test]
    fn structured_bare_array_drops_bad_records() {
        let sessions =
            normalize_sessions_structured(&json!([{"id": 1}, {"name": "x"}, {"id": 2}])).unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn structured_wrapper_keys() {
        let sessions =
            normalize_sessions_structured(&json!({"results": [{"session_id": 5}]})).unwrap();
        assert_eq!(sessions[0].id, 5);
        assert_eq!(sessions[0].name, "Session 5");
    }

    #[test]
    fn structured_object_of_records() {
        let sessions = normalize_sessions_structured(&json!({
            "a": {"id": 1, "name": "One"},
            "b": {"id": 2, "name": "Two"},
            "c": null,
        }))
        .unwrap();
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn structured_unrecognized_shapes() {
        assert!(normalize_sessions_structured(&json!({"count": 3})).is_none());
        assert!(normalize_sessions_structured(&json!({})).is_none());
        assert!(normalize_sessions_structured(&json!("sessions")).is_none());
    }

    // -- legacy rows --

    #[test]
    fn legacy_rows_parse_tuples() {
        let rows = legacy_session_rows(&json!({"session_data": [
            [1, "Algebra"],
            ["2", null, "extra"],
            [3],
            ["x", "bad id"],
            "not a row",
        ]}))
        .unwrap();
        assert_eq!(
            rows,
            vec![(1, "Algebra".to_string()), (2, "Session 2".to_string())]
        );
    }

    #[test]
    fn legacy_rows_absent() {
        assert!(legacy_session_rows(&json!({"sessions": []})).is_none());
        assert!(legacy_session_rows(&json!({"session_data": {}})).is_none());
    }

    // -- normalize_sessions --

    #[tokio::test]
    async fn falsy_payload_is_empty_list() {
        let lookup = RecordingLookup::default();
        for payload in [Value::Null, json!(false), json!(0), json!("")] {
            assert_eq!(normalize_sessions(&payload, &lookup).await, Some(vec![]));
        }
        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn legacy_rows_fetch_documents_per_session() {
        let lookup = RecordingLookup::default();
        let payload = json!({"session_data": [[1, "Algebra"], [2, "Biology"]]});
        let sessions = normalize_sessions(&payload, &lookup).await.unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].name, "Biology");
        assert_eq!(sessions[1].documents[0].title, "doc-for-2");

        let mut calls = lookup.calls.lock().unwrap().clone();
        calls.sort_unstable();
        assert_eq!(calls, [1, 2]);
    }

    #[tokio::test]
    async fn empty_legacy_rows_fall_through() {
        let lookup = RecordingLookup::default();
        let payload = json!({"session_data": [], "sessions": [{"id": 9}]});
        let sessions = normalize_sessions(&payload, &lookup).await.unwrap();
        assert_eq!(sessions[0].id, 9);
        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unrecognized_payload_is_none() {
        let lookup = RecordingLookup::default();
        assert!(normalize_sessions(&json!({"error": "nope"}), &lookup).await.is_none());
        assert!(normalize_sessions(&json!(17), &lookup).await.is_none());
    }

    proptest! {
        #[test]
        fn well_formed_sessions_keep_their_id(id in -1_000_000i64..1_000_000, name in "[a-zA-Z ]{0,12}") {
            let session = normalize_session(&json!({"id": id, "name": name})).unwrap();
            prop_assert_eq!(session.id, id);
            prop_assert!(!session.name.is_empty());
        }

        #[test]
        fn records_without_id_aliases_are_rejected(name in ".*", extra in 0i64..100) {
            let raw = json!({"name": name, "count": extra, "documents": []});
            prop_assert!(normalize_session(&raw).is_none());
        }
    }
}
