use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_LEETCODE_GRAPHQL_URL: &str = "https://leetcode.com/graphql";

/// Application configuration loaded from environment variables (and `.env`).
/// Everything is optional; the embedding endpoint switches the similarity backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub leetcode_graphql_url: String,
    pub http_timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_token: optional_env("GITHUB_TOKEN"),
            leetcode_graphql_url: optional_env("LEETCODE_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_LEETCODE_GRAPHQL_URL.to_string()),
            http_timeout: Duration::from_secs(
                std::env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding_api_url: None,
            embedding_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_token: None,
            leetcode_graphql_url: DEFAULT_LEETCODE_GRAPHQL_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            port: 8080,
        }
    }
}

/// Unset and blank are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
