//! Free-text flashcard mining.
//!
//! Strategies run in order; the first one that yields at least one valid
//! card wins:
//!
//! 1. the whole text as JSON
//! 2. the widest `[...]` or `{...}` span as JSON
//! 3. blank-line separated sections (first line question, rest answer)
//! 4. consecutive non-blank line pairs
//! 5. inline `Q: ... A: ...` blocks
//!
//! Mining is deterministic and uncapped.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::flashcards::records::{CardParts, cards_from_value, finalize};
use crate::flashcards::text::{
    strip_answer_label, strip_question_label, strip_trailing_number, strip_wrapping_quotes,
};
use crate::models::Flashcard;

static BRACKET_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").unwrap());
static BRACE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").unwrap());
static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:question|q)\s*\d*\s*:").unwrap());
static ANSWER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:answer|a)\s*\d*\s*:").unwrap());

/// Mine flashcards from free-form text. Never fails; may return nothing.
pub fn mine_flashcards(text: &str) -> Vec<Flashcard> {
    let normalized = text.replace("\r\n", "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let strategies: [(&str, fn(&str) -> Vec<Flashcard>); 5] = [
        ("json", from_json),
        ("embedded_json", from_embedded_json),
        ("sections", from_sections),
        ("line_pairs", from_line_pairs),
        ("qa_markers", from_markers),
    ];
    for (name, strategy) in strategies {
        let cards = strategy(trimmed);
        if !cards.is_empty() {
            debug!(strategy = name, count = cards.len(), "mined flashcards");
            return cards;
        }
    }
    debug!(chars = trimmed.chars().count(), "no flashcards found in text");
    Vec::new()
}

fn from_json(text: &str) -> Vec<Flashcard> {
    serde_json::from_str::<Value>(text)
        .map(|value| cards_from_value(&value))
        .unwrap_or_default()
}

fn from_embedded_json(text: &str) -> Vec<Flashcard> {
    [&*BRACKET_SPAN, &*BRACE_SPAN]
        .into_iter()
        .filter_map(|pattern| pattern.find(text))
        .map(|span| from_json(span.as_str()))
        .find(|cards| !cards.is_empty())
        .unwrap_or_default()
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

fn parts_from_lines(question: &str, answer: &str) -> CardParts {
    CardParts::new(
        strip_wrapping_quotes(strip_question_label(question)),
        strip_wrapping_quotes(strip_answer_label(answer)),
    )
}

fn from_sections(text: &str) -> Vec<Flashcard> {
    let parts = BLANK_LINES.split(text).filter_map(|section| {
        let mut lines = non_blank_lines(section);
        let question = lines.next()?;
        let answer = lines.collect::<Vec<_>>().join(" ");
        Some(parts_from_lines(question, &answer))
    });
    finalize(parts)
}

fn from_line_pairs(text: &str) -> Vec<Flashcard> {
    let lines: Vec<&str> = non_blank_lines(text).collect();
    let parts = lines
        .chunks_exact(2)
        .map(|pair| parts_from_lines(pair[0], pair[1]));
    finalize(parts)
}

// Each question marker opens a block that runs to the next question marker
// or the end of the text. The first answer marker inside the block splits it.
// Only a block cut short by the next marker can carry that item's numbering.
fn from_markers(text: &str) -> Vec<Flashcard> {
    let starts: Vec<_> = QUESTION_MARKER.find_iter(text).collect();
    let parts = starts.iter().enumerate().filter_map(|(i, marker)| {
        let next = starts.get(i + 1);
        let end = next.map_or(text.len(), |next| next.start());
        let block = &text[marker.end()..end];
        let answer_marker = ANSWER_MARKER.find(block)?;
        let question = &block[..answer_marker.start()];
        let answer = &block[answer_marker.end()..];
        let answer = if next.is_some() {
            strip_trailing_number(answer)
        } else {
            answer
        };
        Some(CardParts::new(
            strip_wrapping_quotes(question),
            strip_wrapping_quotes(answer),
        ))
    });
    finalize(parts)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
