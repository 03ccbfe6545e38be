use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::profiles::{analyze_resume_text, ProfileAnalysis};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfilesRequest {
    pub resume_text: String,
}

/// POST /api/v1/profiles
pub async fn handle_profiles(
    State(state): State<AppState>,
    Json(req): Json<ProfilesRequest>,
) -> Result<Json<ProfileAnalysis>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".to_string()));
    }
    let analysis = analyze_resume_text(&req.resume_text, state.fetcher.as_ref()).await;
    Ok(Json(analysis))
}
