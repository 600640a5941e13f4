//! pdfchat-render
//!
//! PDF rendering of document trees. Layout is simple: blocks
//! stacked top to bottom, greedy word wrap, base-14 Helvetica fonts.
//! Placeholders are drawn as styled link annotations so clicks in a PDF
//! viewer can be routed back to the edit loop.

pub mod error;
pub mod layout;
pub mod pdf;
pub mod styles;

pub use pdf::PdfRenderer;
