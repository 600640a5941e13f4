//! The document tree.
//!
//! A [`DocumentNode`] mirrors the JSON document definition returned by the
//! agent, with one extra variant, [`DocumentNode::Segment`], that only the
//! annotator produces. Converting back to JSON turns segments into renderer
//! text runs, so the tree can be handed to any consumer of the plain
//! definition format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::activation;
use crate::placeholder::Segment;

/// Style name attached to placeholder text runs.
pub const PLACEHOLDER_STYLE: &str = "placeholder";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum DocumentNode {
    Leaf(String),
    Segment(Segment),
    Sequence(Vec<DocumentNode>),
    Mapping(BTreeMap<String, DocumentNode>),
    Number(Number),
    Bool(bool),
    Null,
}

impl DocumentNode {
    pub fn leaf(text: impl Into<String>) -> Self {
        DocumentNode::Leaf(text.into())
    }

    /// Build a mapping from `(key, node)` pairs.
    pub fn mapping<K: Into<String>>(fields: impl IntoIterator<Item = (K, DocumentNode)>) -> Self {
        DocumentNode::Mapping(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => DocumentNode::Null,
            Value::Bool(b) => DocumentNode::Bool(b),
            Value::Number(n) => DocumentNode::Number(n),
            Value::String(s) => DocumentNode::Leaf(s),
            Value::Array(items) => {
                DocumentNode::Sequence(items.into_iter().map(DocumentNode::from_json).collect())
            }
            Value::Object(fields) => DocumentNode::Mapping(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, DocumentNode::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            DocumentNode::Null => Value::Null,
            DocumentNode::Bool(b) => Value::Bool(*b),
            DocumentNode::Number(n) => Value::Number(n.clone()),
            DocumentNode::Leaf(s) => Value::String(s.clone()),
            DocumentNode::Segment(segment) => segment_to_json(segment),
            DocumentNode::Sequence(items) => {
                Value::Array(items.iter().map(DocumentNode::to_json).collect())
            }
            DocumentNode::Mapping(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    /// Look up a key on a mapping node.
    pub fn get(&self, key: &str) -> Option<&DocumentNode> {
        match self {
            DocumentNode::Mapping(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Text of a leaf or segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DocumentNode::Leaf(s) => Some(s),
            DocumentNode::Segment(segment) => Some(&segment.text),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DocumentNode]> {
        match self {
            DocumentNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DocumentNode::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DocumentNode::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Value> for DocumentNode {
    fn from(value: Value) -> Self {
        DocumentNode::from_json(value)
    }
}

impl From<DocumentNode> for Value {
    fn from(node: DocumentNode) -> Self {
        node.to_json()
    }
}

impl From<Segment> for DocumentNode {
    fn from(segment: Segment) -> Self {
        DocumentNode::Segment(segment)
    }
}

fn segment_to_json(segment: &Segment) -> Value {
    let mut run = Map::new();
    run.insert("text".to_string(), Value::String(segment.text.clone()));
    if segment.is_placeholder {
        run.insert(
            "style".to_string(),
            Value::String(PLACEHOLDER_STYLE.to_string()),
        );
        run.insert(
            "link".to_string(),
            Value::String(activation::link_for(&segment.text)),
        );
    }
    Value::Object(run)
}
