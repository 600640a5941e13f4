use axum::Json;
use axum::extract::State;

use crate::config::ConfigInfo;
use crate::state::AppState;

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigInfo> {
    Json(state.config.as_ref().clone())
}
