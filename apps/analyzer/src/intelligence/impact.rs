//! Quantified-impact checks for project description lines.

use serde::{Deserialize, Serialize};

/// A description line with no measurable outcome, plus how to fix it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactGap {
    pub line: String,
    pub reason: String,
    pub suggestion: String,
}

/// Share of lines that state a measurable outcome, with the gaps found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantificationSummary {
    pub ratio: f64,
    pub quantified_lines: usize,
    pub total_lines: usize,
    pub gaps: Vec<ImpactGap>,
}

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "many",
    "numerous",
    "various",
    "several",
];

/// True when the line carries a number (which covers `~N` estimates and
/// `3x faster`-style multipliers), a percentage or a currency amount.
pub fn is_quantified(text: &str) -> bool {
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');

    has_digit || has_percent || has_currency
}

/// Checks one line; returns the gap when it has no measurable outcome.
pub fn check_line(text: &str) -> Option<ImpactGap> {
    let text = text.trim();
    if text.is_empty() || is_quantified(text) {
        return None;
    }
    let lower = text.to_lowercase();

    if let Some(vague) = VAGUE_VERBS.iter().find(|v| lower.contains(*v)) {
        return Some(ImpactGap {
            line: text.to_string(),
            reason: format!("Uses vague verb '{vague}' without a measurable outcome"),
            suggestion: format!("Say how much: '{vague}' by X%, in N weeks, for N users"),
        });
    }

    if let Some(vague) = VAGUE_SCALE_WORDS.iter().find(|v| contains_word(&lower, v)) {
        return Some(ImpactGap {
            line: text.to_string(),
            reason: format!("Uses vague scale word '{vague}' without a number"),
            suggestion: format!("Replace '{vague}' with a concrete figure, e.g. '5x', '40%', '3 weeks'"),
        });
    }

    Some(ImpactGap {
        line: text.to_string(),
        reason: "No quantified outcome found".to_string(),
        suggestion: "Add a result metric: a number, percentage, time saved or users served"
            .to_string(),
    })
}

/// Summarises how many of `lines` are quantified.
pub fn summarize(lines: &[&str]) -> QuantificationSummary {
    let lines: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    let gaps: Vec<ImpactGap> = lines.iter().filter_map(|l| check_line(l)).collect();
    let total_lines = lines.len();
    let quantified_lines = total_lines - gaps.len();
    let ratio = if total_lines == 0 {
        0.0
    } else {
        quantified_lines as f64 / total_lines as f64
    };

    QuantificationSummary {
        ratio,
        quantified_lines,
        total_lines,
        gaps,
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}
