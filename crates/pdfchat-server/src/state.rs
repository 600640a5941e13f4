use std::sync::Arc;

use tokio::sync::Mutex;

use pdfchat_agent::ChatAgent;
use pdfchat_core::chat::Transcript;
use pdfchat_core::controller::InteractionController;
use pdfchat_render::PdfRenderer;

use crate::config::ConfigInfo;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<InteractionController<PdfRenderer>>>,
    pub transcript: Arc<Mutex<Transcript>>,
    pub agent: Arc<dyn ChatAgent>,
    pub config: Arc<ConfigInfo>,
}

impl AppState {
    pub fn new(agent: Arc<dyn ChatAgent>, renderer: PdfRenderer, config: ConfigInfo) -> Self {
        Self {
            controller: Arc::new(Mutex::new(InteractionController::new(renderer))),
            transcript: Arc::new(Mutex::new(Transcript::default())),
            agent,
            config: Arc::new(config),
        }
    }
}
