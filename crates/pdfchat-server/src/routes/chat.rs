use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pdfchat_core::chat::ChatMessage;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub user: ChatMessage,
    pub reply: ChatMessage,
    pub document_updated: bool,
    pub revision: u64,
}

pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.transcript.lock().await.messages().to_vec())
}

/// Forward a user message to the agent and load any document it returns.
///
/// Agent failures are reported as a system message in the transcript, not
/// as an HTTP error. The transcript and controller locks are not held
/// during the agent call, so submissions can overlap; a reply for an older
/// turn never replaces a newer document.
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let (turn, user) = state.transcript.lock().await.push_user(&req.message)?;
    info!(turn = turn.0, message_id = %user.id, "chat message submitted");

    let agent = state.agent.clone();
    let message = req.message;
    let result = tokio::task::spawn_blocking(move || agent.send(&message)).await?;

    let (reply_text, document_updated) = match result {
        Ok(reply) => {
            let updated = match &reply.document {
                Some(document) => {
                    state
                        .controller
                        .lock()
                        .await
                        .accept_agent_document(turn, document)
                }
                None => false,
            };
            (reply.text, updated)
        }
        Err(e) => {
            warn!(turn = turn.0, error = %e, "agent call failed");
            (e.user_notice().to_string(), false)
        }
    };

    let revision = state.controller.lock().await.revision();
    let reply = state.transcript.lock().await.push_system(reply_text);

    Ok(Json(ChatResponse {
        user,
        reply,
        document_updated,
        revision,
    }))
}
