//! Label and quote cleanup shared by the mining strategies.

use std::sync::LazyLock;

use regex::Regex;

/// Leading list numbering or bullet: `1.`, `2)`, `-`, `*`, `•`.
static LIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+\s*[.)]\s*|[-*•]\s+)").unwrap());

/// Leading question label, optionally bolded: `Question 1:`, `**Q:**`, `Q.`.
static QUESTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?\s*(?:question\s*\d*\s*[:.)\-]|q\s*\d*\s*[:.)])\s*(?:\*\*)?\s*")
        .unwrap()
});

/// Leading answer label, optionally bulleted or bolded: `Answer:`, `- A:`.
static ANSWER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s*)?(?:\*\*)?\s*(?:answer\s*\d*\s*[:.\-]|a\s*\d*\s*[:)])\s*(?:\*\*)?\s*")
        .unwrap()
});

/// Trailing list number left behind when a block ends where the next item starts.
static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d+\s*[.)]\s*$").unwrap());

const WRAPPING_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’', '`', '*'];

/// Strip numbering and a question label from the start of a line.
pub(crate) fn strip_question_label(line: &str) -> &str {
    let line = LIST_PREFIX.find(line).map_or(line, |m| &line[m.end()..]);
    let line = QUESTION_LABEL.find(line).map_or(line, |m| &line[m.end()..]);
    line.trim()
}

/// Strip an answer label from the start of a line.
pub(crate) fn strip_answer_label(line: &str) -> &str {
    ANSWER_LABEL
        .find(line)
        .map_or(line, |m| &line[m.end()..])
        .trim()
}

const SENTENCE_END: &[char] = &['.', '!', '?', ')', '"', '\'', '”', '’'];

/// Strip a trailing list number (`... 2.`) from a captured block.
///
/// The number only counts as list numbering when it follows finished text,
/// so `It is 100.` and a bare `42.` are kept whole.
pub(crate) fn strip_trailing_number(text: &str) -> &str {
    let Some(number) = TRAILING_NUMBER.find(text) else {
        return text.trim_end();
    };
    let rest = text[..number.start()].trim_end();
    if rest.ends_with(SENTENCE_END) {
        rest
    } else {
        text.trim_end()
    }
}

/// Trim whitespace and wrapping quote/emphasis characters, straight or curly.
pub(crate) fn strip_wrapping_quotes(text: &str) -> &str {
    text.trim()
        .trim_matches(|c: char| WRAPPING_CHARS.contains(&c) || c.is_whitespace())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
