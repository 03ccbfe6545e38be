//! Profile URL discovery and résumé formatting checks.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

const LONG_PARAGRAPH_WORDS: usize = 100;

static PROFILE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?(github\.com|linkedin\.com|figma\.com|leetcode\.com)(/[\w\-./?=&%@]*)?",
    )
    .expect("static regex")
});
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex"));
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("static regex"));
static BULLET_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*([•\-*◦▪‣●]|\d+[.)])\s").expect("static regex"));

/// Finds GitHub / LinkedIn / LeetCode / Figma URLs, normalised to `https://`,
/// de-duplicated and sorted.
pub fn extract_urls(text: &str) -> Vec<String> {
    let urls: BTreeSet<String> = PROFILE_URL
        .captures_iter(text)
        .map(|c| {
            let domain = c[1].to_ascii_lowercase();
            let path = c.get(2).map(|m| m.as_str()).unwrap_or("");
            let path = path.trim_end_matches(['.', ',', '/']);
            format!("https://{domain}{path}")
        })
        .collect();
    urls.into_iter().collect()
}

/// Layout problems a recruiter would notice.
pub fn check_format(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n");
    let mut issues = Vec::new();

    if EXCESS_NEWLINES.is_match(&text) {
        issues.push("Inconsistent line spacing detected".to_string());
    }

    if PARAGRAPH_BREAK
        .split(&text)
        .any(|p| p.split_whitespace().count() > LONG_PARAGRAPH_WORDS)
    {
        issues.push("Very long paragraph detected".to_string());
    }

    let styles: BTreeSet<String> = BULLET_STYLE
        .captures_iter(&text)
        .map(|c| {
            let marker = &c[1];
            // "1." and "2." are the same numbered style
            if marker.starts_with(|ch: char| ch.is_ascii_digit()) {
                "numbered".to_string()
            } else {
                marker.to_string()
            }
        })
        .collect();
    if styles.len() > 1 {
        issues.push("Inconsistent bullet point usage".to_string());
    }

    issues
}
