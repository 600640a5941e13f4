//! pdfchat-server library root.
//!
//! Exposes the router and its modules so integration tests can drive the
//! HTTP API without binding a socket.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/config", get(routes::config::get_config))
        .route("/messages", get(routes::chat::list_messages))
        .route("/chat", post(routes::chat::send_message))
        .route("/document", get(routes::document::get_document))
        .route("/preview.pdf", get(routes::document::get_preview))
        .route("/edit", get(routes::edit::get_edit_state))
        .route("/edit/begin", post(routes::edit::begin_edit))
        .route("/edit/confirm", post(routes::edit::confirm_edit))
        .route("/edit/cancel", post(routes::edit::cancel_edit))
        .layer(cors)
        .with_state(state)
}
