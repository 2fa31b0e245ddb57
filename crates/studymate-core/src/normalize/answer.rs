//! Answer extraction for ask-question replies.

use serde_json::Value;

use crate::constants::ANSWER_KEYS;
use crate::value::probe;

/// Extract the assistant's answer text from a reply payload.
///
/// A bare string is the answer. An object is probed with the answer keys;
/// if the resolved value is a container, exactly one more level is probed.
/// Anything nested deeper yields `None`.
pub fn extract_answer(payload: &Value) -> Option<String> {
    match payload {
        Value::String(answer) => Some(answer.clone()),
        Value::Object(_) => match probe_answer(payload)? {
            Value::String(answer) => Some(answer.clone()),
            nested @ (Value::Object(_) | Value::Array(_)) => unwrap_nested(nested),
            _ => None,
        },
        _ => None,
    }
}

// Second and last level: only a string answer is accepted here.
fn unwrap_nested(nested: &Value) -> Option<String> {
    probe_answer(nested)?.as_str().map(str::to_string)
}

fn probe_answer(payload: &Value) -> Option<&Value> {
    probe(payload.as_object()?, ANSWER_KEYS)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
