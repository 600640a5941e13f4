use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use pdfchat_core::controller::{EditPrompt, EditState};

use crate::error::ApiError;
use crate::state::AppState;

/// Placeholder activation. The front-end sends either the literal text or
/// the `pdfchat://edit?...` link it intercepted in the preview.
#[derive(Deserialize)]
pub struct BeginEditRequest {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmEditRequest {
    pub value: String,
}

#[derive(Serialize)]
pub struct ConfirmEditResponse {
    pub notice: Option<String>,
    pub replaced: usize,
    pub revision: u64,
}

pub async fn get_edit_state(State(state): State<AppState>) -> Json<EditState> {
    Json(state.controller.lock().await.state())
}

pub async fn begin_edit(
    State(state): State<AppState>,
    Json(req): Json<BeginEditRequest>,
) -> Result<Json<EditPrompt>, ApiError> {
    let mut controller = state.controller.lock().await;
    let prompt = match (req.target, req.link) {
        (Some(target), _) => controller.begin_edit(&target)?,
        (None, Some(link)) => controller.begin_edit_from_link(&link)?,
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either target or link is required".to_string(),
            ));
        }
    };
    Ok(Json(prompt))
}

/// Apply the edit. With nothing pending this is a no-op that reports the
/// unchanged revision.
pub async fn confirm_edit(
    State(state): State<AppState>,
    Json(req): Json<ConfirmEditRequest>,
) -> Json<ConfirmEditResponse> {
    let (outcome, revision) = {
        let mut controller = state.controller.lock().await;
        let outcome = controller.confirm_edit(&req.value);
        (outcome, controller.revision())
    };

    let response = match outcome {
        Some(outcome) => {
            state
                .transcript
                .lock()
                .await
                .push_system(outcome.notice.clone());
            ConfirmEditResponse {
                notice: Some(outcome.notice),
                replaced: outcome.replaced,
                revision: outcome.revision,
            }
        }
        None => ConfirmEditResponse {
            notice: None,
            replaced: 0,
            revision,
        },
    };

    Json(response)
}

pub async fn cancel_edit(State(state): State<AppState>) -> Json<EditState> {
    let mut controller = state.controller.lock().await;
    controller.cancel_edit();
    Json(controller.state())
}
