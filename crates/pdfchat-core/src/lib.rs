//! pdfchat-core
//!
//! Pure domain types for the chat-to-PDF generator: the document tree,
//! placeholder tokenizing, tree annotation and rewriting, and the
//! interaction controller that drives the edit loop.
//! No HTTP or PDF dependency here. Rendering sits behind the
//! [`bridge::RenderBridge`] seam and the agent lives in `pdfchat-agent`.

pub mod activation;
pub mod annotate;
pub mod bridge;
pub mod chat;
pub mod controller;
pub mod error;
pub mod node;
pub mod placeholder;
pub mod rewrite;
