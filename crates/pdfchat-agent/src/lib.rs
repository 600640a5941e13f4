//! pdfchat-agent
//!
//! Remote chat agent invocation and document payload extraction.

pub mod client;
pub mod error;
pub mod extract;

pub use client::{AgentClient, AgentReply, AgentSettings, ChatAgent};
pub use error::AgentError;
