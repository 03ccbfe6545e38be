pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::intelligence::handlers::handle_analyze;
use crate::profiles::handlers::handle_profiles;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handle_analyze))
        .route("/api/v1/profiles", post(handle_profiles))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::intelligence::embedding_client::EmbeddingError;
    use crate::intelligence::similarity::{
        ScorerBackend, SemanticScorer, SimilarityMatrix, TfIdfScorer,
    };
    use crate::profiles::fetcher::HttpProfileFetcher;

    struct UnreachableEmbeddings;

    #[async_trait]
    impl SemanticScorer for UnreachableEmbeddings {
        async fn similarity_matrix(
            &self,
            _left: &[String],
            _right: &[String],
        ) -> Result<SimilarityMatrix, EmbeddingError> {
            Err(EmbeddingError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }

        fn backend(&self) -> ScorerBackend {
            ScorerBackend::Embedding
        }
    }

    fn test_state() -> AppState {
        state_with(Arc::new(TfIdfScorer))
    }

    fn state_with(scorer: Arc<dyn SemanticScorer>) -> AppState {
        let config = Config::default();
        AppState {
            fetcher: Arc::new(HttpProfileFetcher::new(&config).unwrap()),
            scorer,
            config,
        }
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        post_json_to(test_state(), uri, body).await
    }

    async fn post_json_to(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "analyzer");
        assert_eq!(body["similarity_backend"], "tfidf");
    }

    #[tokio::test]
    async fn test_analyze_returns_report() {
        let (status, body) = post_json(
            "/api/v1/analyze",
            json!({
                "resume_text": "Skills\nRust, Docker\n\nProjects\nCache:\n- Built a Rust cache serving 10k requests per second",
                "job_description": "Requirements:\n- Rust\n- Kubernetes"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alignment"]["backend"], "tfidf");
        assert!(body["markdown"].as_str().unwrap().contains("Resume Analysis Report"));
    }

    #[tokio::test]
    async fn test_analyze_embedding_failure_uses_error_envelope() {
        let (status, body) = post_json_to(
            state_with(Arc::new(UnreachableEmbeddings)),
            "/api/v1/analyze",
            json!({
                "resume_text": "Skills\nRust, Docker",
                "job_description": "Requirements:\n- Rust\n- Kubernetes"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "EMBEDDING_ERROR");
        assert_eq!(
            body["error"]["message"],
            "The embedding service could not be reached"
        );
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_resume() {
        let (status, body) = post_json(
            "/api/v1/analyze",
            json!({"resume_text": "  ", "job_description": "Rust"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_profiles_without_urls() {
        let (status, body) = post_json(
            "/api/v1/profiles",
            json!({"resume_text": "Jane Doe\nBackend engineer"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["urls"], json!([]));
        assert!(body["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r == "Resume: No professional profile URLs found"));
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_envelope() {
        let (status, body) = post_json("/api/v1/nope", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
