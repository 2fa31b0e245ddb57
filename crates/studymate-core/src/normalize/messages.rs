//! Chat message normalization.
//!
//! Three entry encodings are accepted uniformly:
//!
//! - a string using the `sender:text` convention (split on the first colon)
//! - a positional array `[sender, text, createdAt?]`
//! - an object probed with the message alias lists
//!
//! Messages without a source id get `line-<index>`.

use serde_json::Value;

use crate::constants::{
    ASSISTANT_SENDERS, ENTRY_LIST_KEYS, MESSAGE_ID_KEYS, MESSAGE_SENDER_KEYS,
    MESSAGE_TEXT_KEYS, MESSAGE_TIMESTAMP_KEYS, USER_SENDERS,
};
use crate::models::{ChatMessage, ChatSender};
use crate::timestamps::parse_timestamp_millis;
use crate::value::{coerce_text, display_number, probe, probe_str};

/// Classify a raw sender string.
///
/// Case-insensitive match against the user and assistant vocabularies. Any
/// other string counts as the user only if it starts with `"user"`;
/// everything else becomes the assistant. Unknown senders are not an error.
pub fn classify_sender(raw: &str) -> ChatSender {
    let normalized = raw.trim().to_lowercase();
    if USER_SENDERS.contains(&normalized.as_str()) {
        return ChatSender::User;
    }
    if ASSISTANT_SENDERS.contains(&normalized.as_str()) {
        return ChatSender::Assistant;
    }
    if normalized.starts_with("user") {
        ChatSender::User
    } else {
        ChatSender::Assistant
    }
}

fn sender_from_value(value: Option<&Value>) -> ChatSender {
    value
        .and_then(Value::as_str)
        .map_or(ChatSender::Assistant, classify_sender)
}

fn synthetic_id(index: usize) -> String {
    format!("line-{index}")
}

/// Normalize a single history entry.
///
/// Returns `None` for `null` and for scalars other than strings.
pub fn normalize_message_entry(entry: &Value, index: usize) -> Option<ChatMessage> {
    match entry {
        Value::String(line) => Some(message_from_line(line, index)),
        Value::Array(items) => Some(message_from_tuple(items, index)),
        Value::Object(record) => {
            let sender = sender_from_value(probe(record, MESSAGE_SENDER_KEYS));
            let text = probe(record, MESSAGE_TEXT_KEYS)
                .map(coerce_text)
                .unwrap_or_default();
            let created_at = probe_str(record, MESSAGE_TIMESTAMP_KEYS).map(str::to_string);
            let id = match probe(record, MESSAGE_ID_KEYS) {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(n)) => format!("line-{}", display_number(n)),
                _ => synthetic_id(index),
            };
            Some(ChatMessage {
                id,
                sender,
                text,
                created_at,
            })
        }
        _ => None,
    }
}

fn message_from_line(line: &str, index: usize) -> ChatMessage {
    match line.split_once(':') {
        Some((sender, text)) => ChatMessage {
            id: synthetic_id(index),
            sender: classify_sender(sender),
            text: text.trim().to_string(),
            created_at: None,
        },
        None => ChatMessage {
            id: synthetic_id(index),
            sender: ChatSender::Assistant,
            text: line.to_string(),
            created_at: None,
        },
    }
}

fn message_from_tuple(items: &[Value], index: usize) -> ChatMessage {
    let sender = sender_from_value(items.first());
    let text = items.get(1).map(coerce_text).unwrap_or_default();
    let created_at = items.get(2).and_then(Value::as_str).map(str::to_string);
    ChatMessage {
        id: synthetic_id(index),
        sender,
        text,
        created_at,
    }
}

/// Normalize a list of entries, dropping the ones that are not messages.
///
/// Indices used for synthetic ids are source positions, so a dropped entry
/// leaves a gap.
pub fn normalize_messages(entries: &[Value]) -> Vec<ChatMessage> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| normalize_message_entry(entry, index))
        .collect()
}

/// Locate the list of entries in a history payload.
///
/// A bare array is the list. Otherwise the first array found under
/// [`ENTRY_LIST_KEYS`] wins. `None` means the shape is not recognized.
pub fn extract_entries(payload: &Value) -> Option<&[Value]> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(record) => ENTRY_LIST_KEYS
            .iter()
            .find_map(|key| record.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice),
        _ => None,
    }
}

/// Order messages by timestamp, ascending.
///
/// Two messages are compared only when both timestamps parse; otherwise
/// their relative order is left alone. This is a partial order, so the sort
/// is a stable insertion pass that stops at the first message it cannot
/// compare against.
pub fn sort_messages_by_timestamp(messages: &mut [ChatMessage]) {
    let mut keys: Vec<Option<i64>> = messages
        .iter()
        .map(|message| message.created_at.as_deref().and_then(parse_timestamp_millis))
        .collect();

    for i in 1..messages.len() {
        let mut j = i;
        while j > 0 {
            match (keys[j - 1], keys[j]) {
                (Some(prev), Some(current)) if prev > current => {
                    messages.swap(j - 1, j);
                    keys.swap(j - 1, j);
                    j -= 1;
                }
                _ => break,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // -- classify_sender --

    #[test]
    fn known_user_senders() {
        for raw in ["user", "Human", " YOU ", "student"] {
            assert_eq!(classify_sender(raw), ChatSender::User, "{raw}");
        }
    }

    #[test]
    fn known_assistant_senders() {
        for raw in ["assistant", "Bot", "AI", "tutor"] {
            assert_eq!(classify_sender(raw), ChatSender::Assistant, "{raw}");
        }
    }

    #[test]
    fn user_prefix_counts_as_user() {
        assert_eq!(classify_sender("user_42"), ChatSender::User);
        assert_eq!(classify_sender("Username"), ChatSender::User);
    }

    /// Unrecognized senders silently become the assistant, even ones that are
    /// plainly people. This mirrors the backend contract and is pinned here so
    /// a change is deliberate.
    #[test]
    fn unrecognized_senders_fall_back_to_assistant() {
        assert_eq!(classify_sender("instructor"), ChatSender::Assistant);
        assert_eq!(classify_sender("me"), ChatSender::Assistant);
        assert_eq!(classify_sender("system"), ChatSender::Assistant);
        assert_eq!(classify_sender(""), ChatSender::Assistant);
    }

    // -- string entries --

    #[test]
    fn string_entry_splits_on_first_colon() {
        let message = normalize_message_entry(&json!("user: what is: this?"), 3).unwrap();
        assert_eq!(message.id, "line-3");
        assert_eq!(message.sender, ChatSender::User);
        assert_eq!(message.text, "what is: this?");
        assert!(message.created_at.is_none());
    }

    #[test]
    fn string_entry_without_colon_is_assistant_text() {
        let message = normalize_message_entry(&json!("Plain answer"), 0).unwrap();
        assert_eq!(message.sender, ChatSender::Assistant);
        assert_eq!(message.text, "Plain answer");
    }

    // -- tuple entries --

    #[test]
    fn tuple_entry_reads_positions() {
        let message =
            normalize_message_entry(&json!(["human", "hello", "2024-01-01T00:00:00Z"]), 1)
                .unwrap();
        assert_eq!(message.id, "line-1");
        assert_eq!(message.sender, ChatSender::User);
        assert_eq!(message.text, "hello");
        assert_eq!(message.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn tuple_entry_coerces_non_string_text() {
        let message = normalize_message_entry(&json!(["bot", 42]), 0).unwrap();
        assert_eq!(message.text, "42");
        let message = normalize_message_entry(&json!(["bot"]), 0).unwrap();
        assert_eq!(message.text, "");
        let message = normalize_message_entry(&json!(["bot", "x", 17]), 0).unwrap();
        assert!(message.created_at.is_none());
    }

    // -- object entries --

    #[test]
    fn object_entry_probes_aliases() {
        let message = normalize_message_entry(
            &json!({"role": "assistant", "content": "Hi there", "timestamp": "2024-02-02"}),
            5,
        )
        .unwrap();
        assert_eq!(message.id, "line-5");
        assert_eq!(message.sender, ChatSender::Assistant);
        assert_eq!(message.text, "Hi there");
        assert_eq!(message.created_at.as_deref(), Some("2024-02-02"));
    }

    #[test]
    fn object_entry_string_id_used_verbatim() {
        let message =
            normalize_message_entry(&json!({"uuid": "abc-123", "sender": "user"}), 0).unwrap();
        assert_eq!(message.id, "abc-123");
    }

    #[test]
    fn object_entry_numeric_id_is_prefixed() {
        let message = normalize_message_entry(&json!({"message_id": 99}), 0).unwrap();
        assert_eq!(message.id, "line-99");
    }

    #[test]
    fn object_entry_non_scalar_id_uses_index() {
        let message = normalize_message_entry(&json!({"id": true}), 4).unwrap();
        assert_eq!(message.id, "line-4");
    }

    #[test]
    fn object_entry_missing_text_is_empty() {
        let message = normalize_message_entry(&json!({"sender": "user"}), 0).unwrap();
        assert_eq!(message.text, "");
        assert_eq!(message.sender, ChatSender::User);
    }

    #[test]
    fn object_entry_timestamp_skips_non_strings() {
        let message = normalize_message_entry(
            &json!({"created_at": 1_700_000_000, "createdAt": "2024-03-03"}),
            0,
        )
        .unwrap();
        assert_eq!(message.created_at.as_deref(), Some("2024-03-03"));
    }

    #[test]
    fn scalars_and_null_are_skipped() {
        assert!(normalize_message_entry(&Value::Null, 0).is_none());
        assert!(normalize_message_entry(&json!(5), 0).is_none());
        assert!(normalize_message_entry(&json!(true), 0).is_none());
    }

    #[test]
    fn mixed_encodings_yield_one_message_each() {
        let entries = vec![
            json!("user: hi"),
            json!(["assistant", "hello"]),
            json!({"sender": "bot", "message": "how can I help?"}),
        ];
        let messages = normalize_messages(&entries);
        assert_eq!(messages.len(), 3);
        let ids: Vec<_> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["line-0", "line-1", "line-2"]);
    }

    #[test]
    fn dropped_entries_leave_index_gaps() {
        let messages = normalize_messages(&[Value::Null, json!("user: hi")]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "line-1");
    }

    // -- extract_entries --

    #[test]
    fn extract_entries_bare_array() {
        let payload = json!([1, 2]);
        assert_eq!(extract_entries(&payload).map(<[Value]>::len), Some(2));
    }

    #[test]
    fn extract_entries_wrapper_keys_in_order() {
        let payload = json!({"data": [1], "messages": [1, 2]});
        assert_eq!(extract_entries(&payload).map(<[Value]>::len), Some(2));
    }

    #[test]
    fn extract_entries_skips_non_array_wrappers() {
        let payload = json!({"response": "text", "history": [1, 2, 3]});
        assert_eq!(extract_entries(&payload).map(<[Value]>::len), Some(3));
    }

    #[test]
    fn extract_entries_unrecognized() {
        assert!(extract_entries(&json!({"other": []})).is_none());
        assert!(extract_entries(&json!("text")).is_none());
        assert!(extract_entries(&Value::Null).is_none());
    }

    // -- sort_messages_by_timestamp --

    fn stamped(id: &str, created_at: Option<&str>) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            sender: ChatSender::User,
            text: String::new(),
            created_at: created_at.map(str::to_string),
        }
    }

    fn ids(messages: &[ChatMessage]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn sort_orders_parseable_timestamps() {
        let mut messages = vec![
            stamped("c", Some("2024-01-03T00:00:00Z")),
            stamped("a", Some("2024-01-01T00:00:00Z")),
            stamped("b", Some("2024-01-02T00:00:00Z")),
        ];
        sort_messages_by_timestamp(&mut messages);
        assert_eq!(ids(&messages), ["a", "b", "c"]);
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let mut messages = vec![
            stamped("first", Some("2024-01-01T00:00:00Z")),
            stamped("second", Some("2024-01-01T00:00:00Z")),
        ];
        sort_messages_by_timestamp(&mut messages);
        assert_eq!(ids(&messages), ["first", "second"]);
    }

    #[test]
    fn sort_does_not_move_past_unparseable_timestamps() {
        let mut messages = vec![
            stamped("late", Some("2024-01-05T00:00:00Z")),
            stamped("unknown", None),
            stamped("early", Some("2024-01-01T00:00:00Z")),
        ];
        sort_messages_by_timestamp(&mut messages);
        assert_eq!(ids(&messages), ["late", "unknown", "early"]);
    }

    #[test]
    fn sort_without_timestamps_is_a_no_op() {
        let mut messages = vec![stamped("x", None), stamped("y", Some("garbage"))];
        sort_messages_by_timestamp(&mut messages);
        assert_eq!(ids(&messages), ["x", "y"]);
    }

    proptest! {
        #[test]
        fn senders_are_always_user_or_assistant(raw in ".*") {
            let sender = classify_sender(&raw);
            prop_assert!(matches!(sender, ChatSender::User | ChatSender::Assistant));
        }

        #[test]
        fn string_entries_always_normalize(line in ".*", index in 0usize..1000) {
            let message = normalize_message_entry(&Value::String(line), index);
            prop_assert!(message.is_some());
        }
    }
}
