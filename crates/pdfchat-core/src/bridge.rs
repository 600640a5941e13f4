use std::fmt::Display;

use crate::node::DocumentNode;

/// Turns a document tree into a displayable artifact (PDF bytes).
///
/// Implementations only ever see an immutable snapshot of the tree.
pub trait RenderBridge {
    type Error: Display;

    fn render(&self, tree: &DocumentNode) -> Result<Vec<u8>, Self::Error>;
}
