//! Document payload extraction from agent replies.
//!
//! The agent embeds the document definition in a fenced code block labelled
//! `json`. Only the first such block is used. A reply without one, or with
//! invalid JSON inside it, simply carries no document.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use pdfchat_core::node::DocumentNode;

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// Fallback transcript text when the reply is nothing but a document.
pub const DOCUMENT_UPDATED: &str = "Document updated.";

/// Raw text of the first ```` ```json ```` block, trimmed.
pub fn fenced_json(text: &str) -> Option<&str> {
    JSON_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Parse the embedded document definition, if any.
pub fn extract_document(text: &str) -> Option<DocumentNode> {
    let Some(raw) = fenced_json(text) else {
        warn!("agent reply contains no json block");
        return None;
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => Some(DocumentNode::from_json(value)),
        Err(e) => {
            warn!(error = %e, "agent reply json block is not valid JSON");
            None
        }
    }
}

/// The reply text with every json block removed, trimmed.
pub fn strip_fenced_json(text: &str) -> String {
    JSON_FENCE.replace_all(text, "").trim().to_string()
}
