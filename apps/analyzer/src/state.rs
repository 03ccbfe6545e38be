use std::sync::Arc;

use crate::config::Config;
use crate::intelligence::similarity::SemanticScorer;
use crate::profiles::fetcher::ProfileFetcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Embedding scorer with TF-IDF fallback, or plain TF-IDF when no embedding API is configured.
    pub scorer: Arc<dyn SemanticScorer>,
    pub fetcher: Arc<dyn ProfileFetcher>,
}
