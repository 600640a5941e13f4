//! Document tree → flat list of blocks.
//!
//! Understands the common subset of the pdfmake-style definition: strings,
//! `text` runs (string or inline array), `stack`, `columns`, `ul`, `ol` and
//! `table.body`. Unknown node kinds are skipped.

use tracing::debug;

use pdfchat_core::node::DocumentNode;

use crate::error::RenderError;
use crate::styles::{Alignment, Margins, RenderStyles, StyleSheet, TextStyle};

/// Indent applied per list level, in points.
const LIST_INDENT: f32 = 14.0;

/// A styled piece of inline text.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: TextStyle,
    /// Activation URI for placeholder runs.
    pub link: Option<String>,
}

/// A paragraph: runs laid out together and wrapped as one.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    pub indent: f32,
    pub space_before: f32,
    pub space_after: f32,
}

impl Block {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    style: TextStyle,
    indent: f32,
}

struct Layout<'a> {
    styles: &'a RenderStyles,
    sheet: StyleSheet,
    blocks: Vec<Block>,
}

/// Flatten a document tree into blocks.
///
/// The root may be a full definition (a mapping with `content`) or bare
/// content.
pub fn layout_document(
    root: &DocumentNode,
    styles: &RenderStyles,
) -> Result<Vec<Block>, RenderError> {
    let content = match root {
        DocumentNode::Mapping(_) => root.get("content").ok_or(RenderError::EmptyDocument)?,
        _ => root,
    };

    let sheet = StyleSheet::from_document(root);
    let frame = Frame {
        style: sheet.root_style(styles),
        indent: 0.0,
    };
    let mut layout = Layout {
        styles,
        sheet,
        blocks: Vec::new(),
    };
    layout.block(content, frame);

    debug!(blocks = layout.blocks.len(), "document laid out");
    Ok(layout.blocks)
}

/// Page margins declared by the document, if any.
pub fn page_margins(root: &DocumentNode) -> Option<Margins> {
    root.get("pageMargins").and_then(Margins::from_node)
}

impl Layout<'_> {
    fn block(&mut self, node: &DocumentNode, frame: Frame) {
        match node {
            DocumentNode::Leaf(_) | DocumentNode::Segment(_) => {
                let runs = self.inline(node, frame.style);
                self.push(runs, node, frame);
            }
            DocumentNode::Sequence(items) if is_inline_sequence(items) => {
                let runs = self.inline(node, frame.style);
                self.push(runs, node, frame);
            }
            DocumentNode::Sequence(items) => {
                for item in items {
                    self.block(item, frame);
                }
            }
            DocumentNode::Mapping(_) => self.mapping(node, frame),
            DocumentNode::Number(n) => {
                let runs = vec![self.run(n.to_string(), frame.style, None)];
                self.push(runs, node, frame);
            }
            DocumentNode::Bool(_) | DocumentNode::Null => {}
        }
    }

    fn mapping(&mut self, node: &DocumentNode, frame: Frame) {
        let style = self.sheet.resolve(frame.style, node);
        let inner = Frame { style, ..frame };

        if let Some(text) = node.get("text") {
            let runs = self.inline(text, style);
            self.push(runs, node, frame);
        } else if let Some(stack) = node.get("stack") {
            self.block(stack, inner);
        } else if let Some(columns) = node.get("columns") {
            self.block(columns, inner);
        } else if let Some(items) = node.get("ul").and_then(DocumentNode::as_sequence) {
            self.list(items, inner, |_| "\u{2022} ".to_string());
        } else if let Some(items) = node.get("ol").and_then(DocumentNode::as_sequence) {
            self.list(items, inner, |i| format!("{}. ", i + 1));
        } else if let Some(rows) = node
            .get("table")
            .and_then(|t| t.get("body"))
            .and_then(DocumentNode::as_sequence)
        {
            self.table(rows, node, inner);
        } else {
            debug!("skipping node without text, stack, columns, list or table");
        }
    }

    fn list(&mut self, items: &[DocumentNode], frame: Frame, marker: impl Fn(usize) -> String) {
        let nested = Frame {
            indent: frame.indent + LIST_INDENT,
            ..frame
        };
        for (i, item) in items.iter().enumerate() {
            let before = self.blocks.len();
            self.block(item, nested);
            if let Some(first) = self.blocks.get_mut(before) {
                let style = first.runs.first().map(|r| r.style).unwrap_or(frame.style);
                first.runs.insert(
                    0,
                    Run {
                        text: marker(i),
                        style: TextStyle {
                            underline: false,
                            ..style
                        },
                        link: None,
                    },
                );
            }
        }
    }

    fn table(&mut self, rows: &[DocumentNode], node: &DocumentNode, frame: Frame) {
        for row in rows {
            let Some(cells) = row.as_sequence() else {
                continue;
            };
            let mut runs = Vec::new();
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    runs.push(self.run(" | ".to_string(), frame.style, None));
                }
                runs.extend(self.inline(cell, frame.style));
            }
            self.push(runs, node, frame);
        }
    }

    /// Collect the inline runs of a `text` value.
    fn inline(&self, node: &DocumentNode, style: TextStyle) -> Vec<Run> {
        match node {
            DocumentNode::Leaf(text) => vec![self.run(text.clone(), style, None)],
            DocumentNode::Segment(segment) if segment.is_placeholder => {
                let placeholder_style = TextStyle {
                    color: self.styles.placeholder_color,
                    underline: self.styles.underline_placeholders,
                    ..style
                };
                vec![self.run(
                    segment.text.clone(),
                    placeholder_style,
                    Some(pdfchat_core::activation::link_for(&segment.text)),
                )]
            }
            DocumentNode::Segment(segment) => vec![self.run(segment.text.clone(), style, None)],
            DocumentNode::Sequence(items) => {
                items.iter().flat_map(|item| self.inline(item, style)).collect()
            }
            DocumentNode::Mapping(_) => {
                let style = self.sheet.resolve(style, node);
                match node.get("text") {
                    Some(text) => self.inline(text, style),
                    None => Vec::new(),
                }
            }
            DocumentNode::Number(n) => vec![self.run(n.to_string(), style, None)],
            DocumentNode::Bool(_) | DocumentNode::Null => Vec::new(),
        }
    }

    fn run(&self, text: String, style: TextStyle, link: Option<String>) -> Run {
        Run { text, style, link }
    }

    fn push(&mut self, runs: Vec<Run>, node: &DocumentNode, frame: Frame) {
        let margin = self.sheet.margin(node);
        self.blocks.push(Block {
            runs,
            alignment: self.sheet.alignment(node).unwrap_or_default(),
            indent: frame.indent + margin.map_or(0.0, |m| m.left),
            space_before: margin.map_or(0.0, |m| m.top),
            space_after: margin.map_or(self.styles.block_spacing, |m| m.bottom),
        });
    }
}

/// The annotator turns every string holding a placeholder into a sequence
/// made only of segments; such a sequence renders as one paragraph. Content
/// lists always hold leaves, mappings or such sequences, never bare
/// segments, so they stay stacks.
fn is_inline_sequence(items: &[DocumentNode]) -> bool {
    !items.is_empty() && items.iter().all(|i| matches!(i, DocumentNode::Segment(_)))
}
