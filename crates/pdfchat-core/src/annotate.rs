//! Placeholder annotation of a document tree.

use crate::node::DocumentNode;
use crate::placeholder;

/// Replace every string leaf that contains placeholders with a `Sequence`
/// of its segments, even when the leaf is a single placeholder. A sequence
/// made only of segments is therefore always an annotated string, never a
/// content list.
///
/// Leaves without placeholders are returned as-is, so annotating plain
/// content is a no-op and annotating twice gives the same tree.
/// Sequences and mappings are walked with order and keys preserved.
/// Segments and scalars pass through.
pub fn annotate(node: &DocumentNode) -> DocumentNode {
    match node {
        DocumentNode::Leaf(text) => segments_node(text),
        DocumentNode::Sequence(items) => DocumentNode::Sequence(items.iter().map(annotate).collect()),
        DocumentNode::Mapping(fields) => DocumentNode::Mapping(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), annotate(v)))
                .collect(),
        ),
        DocumentNode::Segment(_)
        | DocumentNode::Number(_)
        | DocumentNode::Bool(_)
        | DocumentNode::Null => node.clone(),
    }
}

/// Tokenize `text` into a segment sequence, or keep it as a leaf when it
/// has no placeholders.
pub(crate) fn segments_node(text: &str) -> DocumentNode {
    match inline_segments(text) {
        Some(segments) => DocumentNode::Sequence(segments),
        None => DocumentNode::Leaf(text.to_string()),
    }
}

/// The segments of `text` as nodes, if it contains any placeholder.
fn inline_segments(text: &str) -> Option<Vec<DocumentNode>> {
    let segments = placeholder::tokenize(text);
    if !segments.iter().any(|s| s.is_placeholder) {
        return None;
    }
    Some(segments.into_iter().map(DocumentNode::Segment).collect())
}

/// Distinct placeholder literals in document order.
///
/// Looks at placeholder segments and at raw leaves, so it works on both
/// annotated and un-annotated trees.
pub fn collect_placeholders(node: &DocumentNode) -> Vec<String> {
    let mut found = Vec::new();
    collect_into(node, &mut found);
    found
}

fn collect_into(node: &DocumentNode, found: &mut Vec<String>) {
    match node {
        DocumentNode::Leaf(text) => {
            for token in placeholder::placeholders(text) {
                push_unique(found, token);
            }
        }
        DocumentNode::Segment(segment) => {
            if segment.is_placeholder {
                push_unique(found, &segment.text);
            }
        }
        DocumentNode::Sequence(items) => {
            for item in items {
                collect_into(item, found);
            }
        }
        DocumentNode::Mapping(fields) => {
            for value in fields.values() {
                collect_into(value, found);
            }
        }
        DocumentNode::Number(_) | DocumentNode::Bool(_) | DocumentNode::Null => {}
    }
}

fn push_unique(found: &mut Vec<String>, token: &str) {
    if !found.iter().any(|t| t == token) {
        found.push(token.to_string());
    }
}
