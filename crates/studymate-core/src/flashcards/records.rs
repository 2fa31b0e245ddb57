//! Structured flashcard extraction.
//!
//! Handles JSON arrays of card records, wrapper objects, and string entries
//! that carry both sides separated by an `answer:` marker.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::constants::{FLASHCARD_ANSWER_KEYS, FLASHCARD_LIST_KEYS, FLASHCARD_QUESTION_KEYS};
use crate::flashcards::text::{strip_answer_label, strip_question_label, strip_wrapping_quotes};
use crate::models::Flashcard;
use crate::value::display_number;

static INLINE_ANSWER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)answer\s*[:\-]").unwrap());

/// Question and answer recovered from one source entry, before id assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CardParts {
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
}

impl CardParts {
    pub(crate) fn new(question: &str, answer: &str) -> Self {
        Self {
            id: None,
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}

/// Turn recovered parts into cards.
///
/// Parts without both sides are dropped. Cards without a source id get
/// `card-<n>`, where `n` counts accepted cards from 1.
pub(crate) fn finalize(parts: impl IntoIterator<Item = CardParts>) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    for part in parts {
        let id = part
            .id
            .unwrap_or_else(|| format!("card-{}", cards.len() + 1));
        if let Some(card) = Flashcard::new(id, &part.question, &part.answer) {
            cards.push(card);
        }
    }
    cards
}

// First alias holding a string or a number.
fn probe_scalar_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(n) => Some(display_number(n)),
            _ => None,
        })
}

fn source_id(record: &Map<String, Value>) -> Option<String> {
    match record.get("id")? {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(n) => Some(display_number(n)),
        _ => None,
    }
}

/// Extract question and answer from one entry.
pub(crate) fn extract_card(entry: &Value) -> Option<CardParts> {
    match entry {
        Value::Object(record) => {
            let question = probe_scalar_text(record, FLASHCARD_QUESTION_KEYS)?;
            let answer = probe_scalar_text(record, FLASHCARD_ANSWER_KEYS)?;
            Some(CardParts {
                id: source_id(record),
                question: strip_wrapping_quotes(&question).to_string(),
                answer: strip_wrapping_quotes(&answer).to_string(),
            })
        }
        Value::String(line) => {
            let marker = INLINE_ANSWER_MARKER.find(line)?;
            let question = strip_question_label(&line[..marker.start()]);
            let answer = strip_answer_label(&line[marker.end()..]);
            Some(CardParts::new(
                strip_wrapping_quotes(question),
                strip_wrapping_quotes(answer),
            ))
        }
        _ => None,
    }
}

/// Cards from a list of entries.
pub(crate) fn cards_from_entries(entries: &[Value]) -> Vec<Flashcard> {
    finalize(entries.iter().filter_map(extract_card))
}

/// Cards from a parsed JSON value.
///
/// Arrays are card lists. Objects are probed for a wrapped list; an object
/// without one is tried as a single card record.
pub fn cards_from_value(value: &Value) -> Vec<Flashcard> {
    match value {
        Value::Array(entries) => cards_from_entries(entries),
        Value::Object(record) => {
            let wrapped = FLASHCARD_LIST_KEYS
                .iter()
                .find_map(|key| record.get(*key).and_then(Value::as_array));
            match wrapped {
                Some(entries) => cards_from_entries(entries),
                None => finalize(extract_card(value)),
            }
        }
        _ => Vec::new(),
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
    fn object_entries_probe_aliases() {
        let cards = cards_from_value(&json!([
            {"front": "Capital of France?", "back": "Paris"},
            {"term": "Osmosis", "definition": "Diffusion of water"},
        ]));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question, "Capital of France?");
        assert_eq!(cards[1].answer, "Diffusion of water");
    }

    #[test]
    fn ids_are_kept_or_assigned_by_accepted_position() {
        let cards = cards_from_value(&json!([
            {"question": "Q1", "answer": ""},
            {"question": "Q2", "answer": "A2"},
            {"id": 9, "question": "Q3", "answer": "A3"},
            {"id": "abc", "question": "Q4", "answer": "A4"},
            {"question": "Q5", "answer": "A5"},
        ]));
        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["card-1", "9", "abc", "card-4"]);
    }

    #[test]
    fn empty_answer_excludes_card() {
        let cards = cards_from_value(&json!([{"question": "Q", "answer": "   "}]));
        assert!(cards.is_empty());
    }

    #[test]
    fn numeric_sides_are_rendered() {
        let cards = cards_from_value(&json!([{"question": "2 + 2?", "answer": 4}]));
        assert_eq!(cards[0].answer, "4");
    }

    #[test]
    fn wrapper_keys_are_probed() {
        let cards = cards_from_value(&json!({"cards": [{"q": "Q", "a": "A"}]}));
        assert_eq!(cards.len(), 1);
        let cards = cards_from_value(&json!({"flashcards": [{"question": "Q1", "answer": "A1"}]}));
        assert_eq!(cards[0].question, "Q1");
    }

    #[test]
    fn lone_card_object() {
        let cards = cards_from_value(&json!({"question": "Q", "answer": "A"}));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "card-1");
    }

    #[test]
    fn string_entries_split_on_answer_marker() {
        let cards = cards_from_value(&json!([
            "Question: What is ATP? Answer: Energy currency",
            "What is a gene? answer - A unit of heredity",
            "No marker here",
        ]));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question, "What is ATP?");
        assert_eq!(cards[0].answer, "Energy currency");
        assert_eq!(cards[1].answer, "A unit of heredity");
    }

    #[test]
    fn quotes_are_stripped_from_sides() {
        let cards = cards_from_value(&json!([{"question": "“Why?”", "answer": "\"Because\""}]));
        assert_eq!(cards[0].question, "Why?");
        assert_eq!(cards[0].answer, "Because");
    }

    #[test]
    fn scalars_yield_nothing() {
        assert!(cards_from_value(&json!("text")).is_empty());
        assert!(cards_from_value(&Value::Null).is_empty());
    }
}
