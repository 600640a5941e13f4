use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pdfchat_agent::AgentClient;
use pdfchat_render::PdfRenderer;
use pdfchat_server::config::{self, LogFormat};
use pdfchat_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let path = config::config_path()?;
    let mut config = config::load_or_init(&path)?;
    config.apply_overrides(|key| std::env::var(key).ok());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    if config.api_key.is_empty() {
        tracing::warn!("no API key configured; set PDFCHAT_API_KEY or api_key in the config file");
    }

    let agent = Arc::new(AgentClient::new(config.agent_settings()));
    let state = AppState::new(agent, PdfRenderer::default(), config::config_info(&config));
    let app = pdfchat_server::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(bind = %config.bind, config = %path.display(), "pdfchat listening");

    axum::serve(listener, app).await?;
    Ok(())
}
