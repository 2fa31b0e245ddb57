//! Flashcard extraction.
//!
//! Structured payloads go through the record extractor; text goes through
//! the [`miner`] cascade. Neither path fails: callers get an empty list and
//! decide what to tell the user. Capping the result is caller policy, see
//! [`MAX_FLASHCARDS`].

pub mod miner;
pub mod records;
mod text;

use serde_json::Value;

use crate::constants::FLASHCARD_LIST_KEYS;
use crate::models::Flashcard;
use crate::normalize::answer::extract_answer;

pub use miner::mine_flashcards;
pub use records::cards_from_value;

/// Default cap applied by callers to a mined or fetched card list.
pub const MAX_FLASHCARDS: usize = 15;

/// Default length of the raw-text preview shown when mining finds nothing.
pub const PREVIEW_CHARS: usize = 400;

/// Parse an assistant reply into flashcards.
pub fn parse_flashcards_response(text: &str) -> Vec<Flashcard> {
    mine_flashcards(text)
}

/// Extract flashcards from a payload of unknown shape.
///
/// Strings are mined. Arrays and objects go through the record extractor;
/// when that finds nothing in an object, an answer-like string inside it
/// (a wrapped list key holding text, or the ask-question answer keys) is
/// mined instead.
pub fn normalize_flashcards_from_unknown(payload: &Value) -> Vec<Flashcard> {
    match payload {
        Value::String(text) => mine_flashcards(text),
        Value::Array(_) => cards_from_value(payload),
        Value::Object(record) => {
            let cards = cards_from_value(payload);
            if !cards.is_empty() {
                return cards;
            }
            FLASHCARD_LIST_KEYS
                .iter()
                .find_map(|key| record.get(*key).and_then(Value::as_str).map(str::to_string))
                .or_else(|| extract_answer(payload))
                .map(|text| mine_flashcards(&text))
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Cap a card list at `max` entries.
pub fn cap_flashcards(mut cards: Vec<Flashcard>, max: usize) -> Vec<Flashcard> {
    cards.truncate(max);
    cards
}

/// Trimmed preview of `text`, at most `max_chars` characters.
///
/// A truncated preview ends with `…`, which counts toward the limit.
pub fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn serialized_card_array_round_trips() {
        let cards = parse_flashcards_response(r#"[{"question":"Q1","answer":"A1"}]"#);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "Q1");
        assert_eq!(cards[0].answer, "A1");
    }

    #[test]
    fn unknown_string_is_mined() {
        let cards = normalize_flashcards_from_unknown(&json!("Q: One?\nA: 1"));
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn unknown_backend_shape() {
        let payload = json!({"flashcards": [
            {"question": "What is a cell?", "answer": "The unit of life"},
            {"question": "Empty", "answer": ""},
        ]});
        let cards = normalize_flashcards_from_unknown(&payload);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "card-1");
    }

    #[test]
    fn unknown_object_with_text_answer() {
        let payload = json!({"response": "Question: What is pH? Answer: Acidity scale"});
        let cards = normalize_flashcards_from_unknown(&payload);
        assert_eq!(cards[0].question, "What is pH?");
        assert_eq!(cards[0].answer, "Acidity scale");
    }

    #[test]
    fn unknown_wrapped_text() {
        let payload = json!({"flashcards": "Q: Define mass\nA: Amount of matter"});
        let cards = normalize_flashcards_from_unknown(&payload);
        assert_eq!(cards[0].answer, "Amount of matter");
    }

    #[test]
    fn unknown_scalars_yield_nothing() {
        assert!(normalize_flashcards_from_unknown(&Value::Null).is_empty());
        assert!(normalize_flashcards_from_unknown(&json!(12)).is_empty());
        assert!(normalize_flashcards_from_unknown(&json!({"status": "ok"})).is_empty());
    }

    #[test]
    fn cap_truncates() {
        let cards: Vec<_> = (0..20)
            .filter_map(|i| Flashcard::new(format!("card-{i}"), "Q", "A"))
            .collect();
        assert_eq!(cap_flashcards(cards, MAX_FLASHCARDS).len(), 15);
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(preview("  short  ", 10), "short");
        let long = "é".repeat(500);
        let out = preview(&long, PREVIEW_CHARS);
        assert_eq!(out.chars().count(), PREVIEW_CHARS);
        assert!(out.ends_with('…'));
    }

    proptest! {
        #[test]
        fn mining_never_panics_and_is_stable(text in ".{0,300}") {
            let first = parse_flashcards_response(&text);
            let second = parse_flashcards_response(&text);
            prop_assert_eq!(&first, &second);
            for card in &first {
                prop_assert!(!card.question.trim().is_empty());
                prop_assert!(!card.answer.trim().is_empty());
            }
        }

        #[test]
        fn preview_respects_limit(text in ".{0,600}", max in 1usize..500) {
            prop_assert!(preview(&text, max).chars().count() <= max);
        }
    }
}
