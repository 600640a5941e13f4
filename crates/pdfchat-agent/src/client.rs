//! HTTP client for the remote chat agent.
//!
//! One POST per user message. The request carries the message and fixed
//! session identifiers; the API key goes in the `x-api-key` header. The
//! call is blocking, so async callers should run it on a blocking thread.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pdfchat_core::node::DocumentNode;

use crate::error::{AgentError, classify_failure};
use crate::extract::{DOCUMENT_UPDATED, extract_document, strip_fenced_json};

pub const DEFAULT_ENDPOINT: &str = "https://agent.api.lyzr.app/v2/chat/";

/// Connection settings, injected from the application config.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub endpoint: String,
    pub api_key: String,
    pub user_id: String,
    pub agent_id: String,
    pub session_id: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    pub user_id: String,
    pub agent_id: String,
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: String,
}

/// A parsed agent reply: transcript text plus an optional document.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    pub document: Option<DocumentNode>,
}

impl AgentReply {
    /// Parse a successful response body.
    pub fn parse(body: &str) -> Result<Self, AgentError> {
        let response: AgentResponse = serde_json::from_str(body)?;
        Ok(Self::from_response(response))
    }

    pub fn from_response(response: AgentResponse) -> Self {
        let document = extract_document(&response.response);

        let text = match response.message.filter(|m| !m.trim().is_empty()) {
            Some(message) => message,
            None => {
                let stripped = strip_fenced_json(&response.response);
                if stripped.is_empty() {
                    DOCUMENT_UPDATED.to_string()
                } else {
                    stripped
                }
            }
        };

        Self { text, document }
    }
}

/// Anything that can answer a chat message.
pub trait ChatAgent: Send + Sync {
    fn send(&self, message: &str) -> Result<AgentReply, AgentError>;
}

pub struct AgentClient {
    settings: AgentSettings,
    http: ureq::Agent,
}

impl AgentClient {
    pub fn new(settings: AgentSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .http_status_as_error(false)
            .build();
        Self {
            settings,
            http: ureq::Agent::new_with_config(config),
        }
    }

    fn request_for(&self, message: &str) -> AgentRequest {
        AgentRequest {
            user_id: self.settings.user_id.clone(),
            agent_id: self.settings.agent_id.clone(),
            session_id: self.settings.session_id.clone(),
            message: message.to_string(),
        }
    }
}

impl ChatAgent for AgentClient {
    fn send(&self, message: &str) -> Result<AgentReply, AgentError> {
        let request = self.request_for(message);

        info!(
            endpoint = %self.settings.endpoint,
            session_id = %self.settings.session_id,
            message_len = message.len(),
            "sending message to agent"
        );

        let mut response = self
            .http
            .post(&self.settings.endpoint)
            .header("x-api-key", &self.settings.api_key)
            .send_json(&request)
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            let err = classify_failure(status, &body);
            warn!(status, error = %err, "agent call failed");
            return Err(err);
        }

        let reply = AgentReply::parse(&body)?;

        info!(
            has_document = reply.document.is_some(),
            "agent reply received"
        );

        Ok(reply)
    }
}
