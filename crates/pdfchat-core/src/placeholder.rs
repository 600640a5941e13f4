//! Bracketed placeholder tokens.
//!
//! A placeholder is `[` followed by one or more characters that are not `]`,
//! followed by `]`. The first `]` closes the token, so tokens never nest.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]").expect("placeholder pattern is valid"));

/// A run of text produced by [`tokenize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub is_placeholder: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_placeholder: false,
        }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_placeholder: true,
        }
    }
}

/// Split `text` into plain and placeholder segments, left to right.
///
/// Gaps between tokens become plain segments; empty gaps produce nothing.
/// A string with no tokens comes back as a single plain segment, so the
/// result is never empty. Unterminated brackets are plain text.
pub fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in PLACEHOLDER.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::plain(&text[last..m.start()]));
        }
        segments.push(Segment::placeholder(m.as_str()));
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::plain(&text[last..]));
    }

    if segments.is_empty() {
        segments.push(Segment::plain(text));
    }

    segments
}

/// True when the whole of `text` is exactly one placeholder token.
pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDER
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

/// Iterate over the placeholder tokens in `text`.
pub fn placeholders(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER.find_iter(text).map(|m| m.as_str())
}

/// Remove every bracket character, giving the edit-prompt prefill.
pub fn strip_brackets(text: &str) -> String {
    text.chars().filter(|c| *c != '[' && *c != ']').collect()
}

/// The placeholder literal for an edited value.
///
/// Brackets inside `value` are dropped so the result is a single token
/// (unless `value` is empty, which gives the plain text `[]`).
pub fn wrap(value: &str) -> String {
    format!("[{}]", strip_brackets(value))
}
