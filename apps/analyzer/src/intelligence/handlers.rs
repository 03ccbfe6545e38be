use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::intelligence::pipeline::{analyze_texts, AnalysisReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".to_string()));
    }
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }
    let report = analyze_texts(&req.resume_text, &req.job_description, state.scorer.as_ref()).await?;
    Ok(Json(report))
}
