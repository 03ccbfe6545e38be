use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Profile platforms the analyzer knows how to fetch and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitHub,
    LinkedIn,
    LeetCode,
    Figma,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::GitHub,
        Platform::LinkedIn,
        Platform::LeetCode,
        Platform::Figma,
    ];

    /// Detects the platform from the URL host (`www.` and subdomains allowed).
    pub fn from_url(url: &str) -> Option<Platform> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| host == p.domain() || host.ends_with(&format!(".{}", p.domain())))
    }

    pub fn domain(&self) -> &'static str {
        match self {
            Platform::GitHub => "github.com",
            Platform::LinkedIn => "linkedin.com",
            Platform::LeetCode => "leetcode.com",
            Platform::Figma => "figma.com",
        }
    }

    /// Share of the trust score this platform carries.
    pub fn weight(&self) -> f64 {
        match self {
            Platform::GitHub => 0.4,
            Platform::LinkedIn => 0.3,
            Platform::LeetCode => 0.2,
            Platform::Figma => 0.1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::GitHub => "GitHub",
            Platform::LinkedIn => "LinkedIn",
            Platform::LeetCode => "LeetCode",
            Platform::Figma => "Figma",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-empty path segments of a URL.
pub fn path_segments(url: &str) -> Vec<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .map(|segs| segs.filter(|s| !s.is_empty()).map(str::to_string).collect())
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_detects_hosts() {
        assert_eq!(Platform::from_url("https://github.com/octocat"), Some(Platform::GitHub));
        assert_eq!(
            Platform::from_url("https://www.linkedin.com/in/jane"),
            Some(Platform::LinkedIn)
        );
        assert_eq!(Platform::from_url("https://leetcode.com/u/jane/"), Some(Platform::LeetCode));
        assert_eq!(Platform::from_url("https://www.figma.com/@jane"), Some(Platform::Figma));
        assert_eq!(Platform::from_url("https://notgithub.com/x"), None);
        assert_eq!(Platform::from_url("not a url"), None);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = Platform::ALL.iter().map(|p| p.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Platform::LeetCode).unwrap(), "\"leetcode\"");
    }

    #[test]
    fn test_path_segments_skips_empty() {
        assert_eq!(path_segments("https://leetcode.com/u/jane/"), vec!["u", "jane"]);
        assert!(path_segments("https://github.com").is_empty());
    }
}
