//! Placeholder rewriting.
//!
//! The rewrite target is a placeholder's literal text, brackets included.
//! Every occurrence of that literal is replaced, not just the one the user
//! clicked.

use crate::annotate::segments_node;
use crate::node::DocumentNode;
use crate::placeholder;

/// Replace `target` with `[replacement_value]` throughout `node`.
///
/// A matching placeholder segment inside a segment sequence is swapped for
/// the segments of the new literal in place, so the annotated string stays
/// one inline run and the new placeholder stays editable. Leaves that are
/// exactly the target become a freshly tokenized node. Other leaves get a
/// literal substring replacement, which covers trees that were never
/// annotated. Everything else is cloned unchanged; if `target` does not
/// occur, the result equals the input.
///
/// Brackets inside `replacement_value` are dropped, see [`placeholder::wrap`].
pub fn rewrite(node: &DocumentNode, target: &str, replacement_value: &str) -> DocumentNode {
    rewrite_counted(node, target, replacement_value).0
}

/// [`rewrite`], also returning how many nodes were replaced.
pub fn rewrite_counted(
    node: &DocumentNode,
    target: &str,
    replacement_value: &str,
) -> (DocumentNode, usize) {
    let replacement = placeholder::wrap(replacement_value);
    let mut count = 0;
    let rewritten = rewrite_node(node, target, &replacement, &mut count);
    (rewritten, count)
}

fn rewrite_node(
    node: &DocumentNode,
    target: &str,
    replacement: &str,
    count: &mut usize,
) -> DocumentNode {
    match node {
        _ if is_target_segment(node, target) => {
            *count += 1;
            segments_node(replacement)
        }
        DocumentNode::Leaf(text) if text == target && placeholder::is_placeholder(text) => {
            *count += 1;
            segments_node(replacement)
        }
        DocumentNode::Leaf(text) if !target.is_empty() && text.contains(target) => {
            *count += 1;
            DocumentNode::Leaf(text.replace(target, replacement))
        }
        DocumentNode::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if is_target_segment(item, target) {
                    *count += 1;
                    out.extend(
                        placeholder::tokenize(replacement)
                            .into_iter()
                            .map(DocumentNode::Segment),
                    );
                } else {
                    out.push(rewrite_node(item, target, replacement, count));
                }
            }
            DocumentNode::Sequence(out)
        }
        DocumentNode::Mapping(fields) => DocumentNode::Mapping(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), rewrite_node(v, target, replacement, count)))
                .collect(),
        ),
        DocumentNode::Leaf(_)
        | DocumentNode::Segment(_)
        | DocumentNode::Number(_)
        | DocumentNode::Bool(_)
        | DocumentNode::Null => node.clone(),
    }
}

fn is_target_segment(node: &DocumentNode, target: &str) -> bool {
    matches!(node, DocumentNode::Segment(s) if s.is_placeholder && s.text == target)
}
