//! Local TF-IDF vectorizer used when no embedding endpoint is configured,
//! and for project relevance scoring.
//!
//! Vectors are `BTreeMap`s so summation order, and therefore every score, is
//! stable across runs.

use std::collections::BTreeMap;

pub type SparseVector = BTreeMap<String, f64>;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours",
];

/// Lower-cased word tokens with stop words removed. `+`, `#` and inner `.`
/// are kept so `c++`, `c#` and `node.js` survive.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// IDF table fitted on a reference corpus (smooth IDF, as in scikit-learn).
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    idf: BTreeMap<String, f64>,
    unseen_idf: f64,
}

impl TfIdfModel {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let n = documents.len() as f64;
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let mut terms = tokenize(doc.as_ref());
            terms.sort();
            terms.dedup();
            for term in terms {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        let idf = df
            .into_iter()
            .map(|(term, count)| (term, ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0))
            .collect();
        Self {
            idf,
            unseen_idf: (1.0 + n).ln() + 1.0,
        }
    }

    /// L2-normalised TF-IDF vector. Depends only on `text` and the fitted table.
    pub fn vectorize(&self, text: &str) -> SparseVector {
        let mut tf: SparseVector = BTreeMap::new();
        for term in tokenize(text) {
            *tf.entry(term).or_insert(0.0) += 1.0;
        }
        for (term, weight) in tf.iter_mut() {
            *weight *= self.idf.get(term).copied().unwrap_or(self.unseen_idf);
        }
        let norm = tf.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in tf.values_mut() {
                *weight /= norm;
            }
        }
        tf
    }
}

/// Cosine of two L2-normalised sparse vectors.
pub fn sparse_cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

/// Fits on `right`, then scores each `left` text against each `right` text.
pub fn similarity_rows<L: AsRef<str>, R: AsRef<str>>(left: &[L], right: &[R]) -> Vec<Vec<f64>> {
    let model = TfIdfModel::fit(right);
    let right_vecs: Vec<SparseVector> = right.iter().map(|r| model.vectorize(r.as_ref())).collect();
    left.iter()
        .map(|l| {
            let lv = model.vectorize(l.as_ref());
            right_vecs.iter().map(|rv| sparse_cosine(&lv, rv)).collect()
        })
        .collect()
}
