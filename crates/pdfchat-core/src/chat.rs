use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

pub const WELCOME_MESSAGE: &str = "Welcome! Start typing to create your PDF.";

/// A single entry in the chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub timestamp: jiff::Timestamp,
    pub kind: MessageKind,
}

/// Who a transcript entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    System,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            timestamp: jiff::Timestamp::now(),
            kind,
        }
    }
}

/// Identifies the chat submission an agent response belongs to.
///
/// Turn ids increase with every submission, so comparing them tells which
/// of two responses was asked for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(pub u64);

/// In-memory chat transcript for one session.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_turn: u64,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::new(MessageKind::System, WELCOME_MESSAGE)],
            next_turn: 1,
        }
    }
}

impl Transcript {
    /// Record a user submission and allocate its turn id.
    ///
    /// Blank messages are rejected and consume no turn.
    pub fn push_user(&mut self, content: &str) -> Result<(TurnId, ChatMessage), CoreError> {
        if content.trim().is_empty() {
            return Err(CoreError::EmptyMessage);
        }
        let message = ChatMessage::new(MessageKind::User, content);
        self.messages.push(message.clone());
        let turn = TurnId(self.next_turn);
        self.next_turn += 1;
        Ok((turn, message))
    }

    pub fn push_system(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::new(MessageKind::System, content);
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
