use thiserror::Error;

pub const RATE_LIMIT_NOTICE: &str =
    "You've run out of credits or hit the rate limit. Please try again later.";

pub const GENERIC_NOTICE: &str =
    "Sorry, something went wrong while generating your document. Please try again.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Transport(String),

    #[error("agent rate limit or credits exhausted (HTTP {status})")]
    RateLimited { status: u16 },

    #[error("agent returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(#[from] serde_json::Error),
}

impl AgentError {
    /// The chat notice shown to the user for this failure.
    pub fn user_notice(&self) -> &'static str {
        match self {
            AgentError::RateLimited { .. } => RATE_LIMIT_NOTICE,
            _ => GENERIC_NOTICE,
        }
    }
}

/// Classify a non-success HTTP response from the agent.
pub fn classify_failure(status: u16, body: &str) -> AgentError {
    let lower = body.to_lowercase();
    let exhausted = lower.contains("credit") || lower.contains("rate limit");
    if status == 429 || status == 402 || exhausted {
        return AgentError::RateLimited { status };
    }

    let mut snippet: String = body.chars().take(200).collect();
    if snippet.len() < body.len() {
        snippet.push('…');
    }
    AgentError::Status {
        status,
        body: snippet,
    }
}
