use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the active similarity backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "analyzer",
        "similarity_backend": state.scorer.backend(),
        "embedding_model": state
            .config
            .embedding_api_url
            .as_ref()
            .map(|_| state.config.embedding_model.as_str()),
    }))
}
