//! Semantic similarity: pluggable, trait-based scorer shared by the skill
//! matcher and the section scorer.
//!
//! `EmbeddingScorer` calls the embedding endpoint; `TfIdfScorer` is local and
//! deterministic. `AppState` and the CLI hold an `Arc<dyn SemanticScorer>`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::intelligence::embedding_client::{EmbeddingClient, EmbeddingError};
use crate::intelligence::tfidf;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Which similarity source produced a matrix. Reported in output for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerBackend {
    Embedding,
    Tfidf,
}

impl ScorerBackend {
    /// Requirements whose best match falls below this are reported missing.
    /// Sparse TF-IDF cosines run lower than dense embedding cosines.
    pub fn missing_threshold(&self) -> f64 {
        match self {
            ScorerBackend::Embedding => 0.45,
            ScorerBackend::Tfidf => 0.30,
        }
    }
}

/// Cosine similarities, one row per left text and one column per right text,
/// clamped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    pub backend: ScorerBackend,
    pub values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn rows(&self) -> usize {
        self.values.len()
    }

    pub fn cols(&self) -> usize {
        self.values.first().map(Vec::len).unwrap_or(0)
    }

    /// Best value in row `i` and the column it came from.
    pub fn row_max(&self, i: usize) -> (f64, Option<usize>) {
        best(self.values[i].iter().copied().enumerate())
    }

    /// Best value in column `j` and the row it came from.
    pub fn col_max(&self, j: usize) -> (f64, Option<usize>) {
        best(self.values.iter().map(|row| row[j]).enumerate())
    }
}

fn best(values: impl Iterator<Item = (usize, f64)>) -> (f64, Option<usize>) {
    values.fold((0.0, None), |(best, at), (idx, v)| {
        if at.is_none() || v > best {
            (v, Some(idx))
        } else {
            (best, at)
        }
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SemanticScorer: Send + Sync {
    async fn similarity_matrix(
        &self,
        left: &[String],
        right: &[String],
    ) -> Result<SimilarityMatrix, EmbeddingError>;

    fn backend(&self) -> ScorerBackend;
}

// ────────────────────────────────────────────────────────────────────────────
// TfIdfScorer
// ────────────────────────────────────────────────────────────────────────────

/// Local TF-IDF scorer. IDF is fitted on the `right` side only, so a left
/// text's score never depends on the other left texts.
pub struct TfIdfScorer;

#[async_trait]
impl SemanticScorer for TfIdfScorer {
    async fn similarity_matrix(
        &self,
        left: &[String],
        right: &[String],
    ) -> Result<SimilarityMatrix, EmbeddingError> {
        Ok(SimilarityMatrix {
            backend: ScorerBackend::Tfidf,
            values: tfidf::similarity_rows(left, right),
        })
    }

    fn backend(&self) -> ScorerBackend {
        ScorerBackend::Tfidf
    }
}

// ────────────────────────────────────────────────────────────────────────────
// EmbeddingScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct EmbeddingScorer(pub EmbeddingClient);

#[async_trait]
impl SemanticScorer for EmbeddingScorer {
    async fn similarity_matrix(
        &self,
        left: &[String],
        right: &[String],
    ) -> Result<SimilarityMatrix, EmbeddingError> {
        if left.is_empty() || right.is_empty() {
            return Ok(SimilarityMatrix {
                backend: ScorerBackend::Embedding,
                values: vec![Vec::new(); left.len()],
            });
        }
        let inputs: Vec<String> = left.iter().chain(right.iter()).cloned().collect();
        let vectors = self.0.embed(&inputs).await?;
        let (left_vecs, right_vecs) = vectors.split_at(left.len());

        let values = left_vecs
            .iter()
            .map(|l| {
                right_vecs
                    .iter()
                    .map(|r| cosine_similarity(l, r))
                    .collect()
            })
            .collect();

        Ok(SimilarityMatrix {
            backend: ScorerBackend::Embedding,
            values,
        })
    }

    fn backend(&self) -> ScorerBackend {
        ScorerBackend::Embedding
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FallbackScorer
// ────────────────────────────────────────────────────────────────────────────

/// Tries `primary`; on failure logs a warning and answers with TF-IDF.
pub struct FallbackScorer {
    primary: Arc<dyn SemanticScorer>,
}

impl FallbackScorer {
    pub fn new(primary: Arc<dyn SemanticScorer>) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl SemanticScorer for FallbackScorer {
    async fn similarity_matrix(
        &self,
        left: &[String],
        right: &[String],
    ) -> Result<SimilarityMatrix, EmbeddingError> {
        match self.primary.similarity_matrix(left, right).await {
            Ok(matrix) => Ok(matrix),
            Err(e) => {
                warn!("Embedding backend failed ({e}); falling back to TF-IDF");
                TfIdfScorer.similarity_matrix(left, right).await
            }
        }
    }

    fn backend(&self) -> ScorerBackend {
        self.primary.backend()
    }
}

/// Cosine of two dense vectors, clamped to [0, 1]. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
