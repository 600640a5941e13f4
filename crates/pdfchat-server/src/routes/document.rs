use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde::Serialize;

use pdfchat_core::annotate::collect_placeholders;
use pdfchat_core::controller::EditState;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DocumentView {
    pub revision: u64,
    pub placeholders: Vec<String>,
    pub edit: EditState,
    pub document: serde_json::Value,
}

/// The current annotated document, as the renderer sees it.
pub async fn get_document(State(state): State<AppState>) -> Result<Json<DocumentView>, ApiError> {
    let controller = state.controller.lock().await;
    let tree = controller
        .current()
        .ok_or_else(|| ApiError::NotFound("no document loaded".to_string()))?;

    Ok(Json(DocumentView {
        revision: controller.revision(),
        placeholders: collect_placeholders(&tree),
        edit: controller.state(),
        document: tree.to_json(),
    }))
}

/// The latest rendered PDF.
pub async fn get_preview(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let controller = state.controller.lock().await;
    let preview = controller
        .preview()
        .ok_or_else(|| ApiError::NotFound("no preview rendered".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::ETAG, format!("\"{}\"", preview.revision)),
        ],
        preview.bytes.as_ref().clone(),
    ))
}
