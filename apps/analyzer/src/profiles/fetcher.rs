//! Profile fetching: one trait, one HTTP implementation that dispatches on
//! the platform of each URL. Fetches are single attempts with no retries.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::profiles::metrics::{ProfileData, ProfileMetrics};
use crate::profiles::platform::Platform;
use crate::profiles::{figma, github, leetcode, linkedin};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("{0} is behind a sign-in wall")]
    AuthWalled(String),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Unsupported profile URL: {0}")]
    UnsupportedUrl(String),

    #[error("Unexpected response from {url}: {message}")]
    Parse { url: String, message: String },
}

#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ProfileData, ScrapeError>;
}

/// Fetches live profile data over HTTP.
#[derive(Clone)]
pub struct HttpProfileFetcher {
    client: Client,
    github_api_url: String,
    github_token: Option<String>,
    leetcode_graphql_url: String,
}

impl HttpProfileFetcher {
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            client,
            github_api_url: config.github_api_url.trim_end_matches('/').to_string(),
            github_token: config.github_token.clone(),
            leetcode_graphql_url: config.leetcode_graphql_url.clone(),
        })
    }

    fn github(&self) -> github::GitHubApi<'_> {
        github::GitHubApi {
            client: &self.client,
            base_url: &self.github_api_url,
            token: self.github_token.as_deref(),
        }
    }
}

#[async_trait]
impl ProfileFetcher for HttpProfileFetcher {
    async fn fetch(&self, url: &str) -> Result<ProfileData, ScrapeError> {
        let platform =
            Platform::from_url(url).ok_or_else(|| ScrapeError::UnsupportedUrl(url.to_string()))?;
        info!("Fetching {platform} profile: {url}");

        let metrics = match platform {
            Platform::GitHub => self.github().fetch(url).await?,
            Platform::LinkedIn => ProfileMetrics::Linkedin(linkedin::fetch(&self.client, url).await?),
            Platform::LeetCode => {
                leetcode::fetch(&self.client, &self.leetcode_graphql_url, url).await?
            }
            Platform::Figma => ProfileMetrics::Figma(figma::fetch(&self.client, url).await?),
        };

        Ok(ProfileData {
            platform,
            url: url.to_string(),
            metrics,
        })
    }
}

/// Maps auth-wall statuses and redirects to `AuthWalled`, other failures to `Status`.
pub(crate) fn check_page_response(
    response: &reqwest::Response,
    url: &str,
) -> Result<(), ScrapeError> {
    let status = response.status().as_u16();
    let landed = response.url().as_str();
    if matches!(status, 401 | 403 | 999) || landed.contains("authwall") || landed.contains("/login") {
        return Err(ScrapeError::AuthWalled(url.to_string()));
    }
    if status == 404 {
        return Err(ScrapeError::NotFound(url.to_string()));
    }
    if !response.status().is_success() {
        return Err(ScrapeError::Status {
            status,
            url: url.to_string(),
        });
    }
    Ok(())
}
