//! GitHub profile and repository metrics via the REST API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::profiles::fetcher::ScrapeError;
use crate::profiles::metrics::{
    GitHubCredibility, GitHubProfileMetrics, GitHubRepositoryMetrics, ProfileMetrics,
};
use crate::profiles::platform::path_segments;

const RESERVED_PATHS: &[&str] = &[
    "orgs", "settings", "topics", "features", "about", "marketplace", "explore", "sponsors",
    "login", "pricing", "collections", "trending",
];
const TOP_LANGUAGES: usize = 3;
const VERIFIED_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum GitHubTarget {
    Profile(String),
    Repository { owner: String, name: String },
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    owner: Option<ApiOwner>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
    description: Option<String>,
    pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    fork: bool,
}

pub fn parse_target(url: &str) -> Result<GitHubTarget, ScrapeError> {
    let segments = path_segments(url);
    match segments.as_slice() {
        [first, ..] if RESERVED_PATHS.contains(&first.to_lowercase().as_str()) => {
            Err(ScrapeError::UnsupportedUrl(url.to_string()))
        }
        [user] => Ok(GitHubTarget::Profile(user.clone())),
        [owner, repo, ..] => Ok(GitHubTarget::Repository {
            owner: owner.clone(),
            name: repo.trim_end_matches(".git").to_string(),
        }),
        [] => Err(ScrapeError::UnsupportedUrl(url.to_string())),
    }
}

pub struct GitHubApi<'a> {
    pub client: &'a Client,
    pub base_url: &'a str,
    pub token: Option<&'a str>,
}

impl GitHubApi<'_> {
    pub async fn fetch(&self, url: &str) -> Result<ProfileMetrics, ScrapeError> {
        match parse_target(url)? {
            GitHubTarget::Profile(username) => {
                let user: ApiUser = self.get_json(&format!("/users/{username}")).await?;
                let repos: Vec<ApiRepo> = self
                    .get_json(&format!("/users/{username}/repos?per_page=100&sort=pushed"))
                    .await?;
                debug!("GitHub user {} has {} repos listed", user.login, repos.len());
                Ok(ProfileMetrics::GithubProfile(profile_metrics(
                    user,
                    &repos,
                    Utc::now(),
                )))
            }
            GitHubTarget::Repository { owner, name } => {
                let repo: ApiRepo = self.get_json(&format!("/repos/{owner}/{name}")).await?;
                Ok(ProfileMetrics::GithubRepository(GitHubRepositoryMetrics {
                    owner: repo.owner.map(|o| o.login).unwrap_or(owner),
                    name: repo.name,
                    stars: repo.stargazers_count,
                    forks: repo.forks_count,
                    language: repo.language,
                    description: repo.description,
                    last_commit: repo.pushed_at,
                }))
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ScrapeError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ScrapeError::NotFound(url));
        }
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url,
            });
        }
        response.json::<T>().await.map_err(|e| ScrapeError::Parse {
            url,
            message: e.to_string(),
        })
    }
}

fn profile_metrics(user: ApiUser, repos: &[ApiRepo], now: DateTime<Utc>) -> GitHubProfileMetrics {
    let account_age_days = user
        .created_at
        .map(|created| (now - created).num_days().max(0))
        .unwrap_or(0);

    let mut languages: BTreeMap<&str, usize> = BTreeMap::new();
    for repo in repos.iter().filter(|r| !r.fork) {
        if let Some(lang) = repo.language.as_deref() {
            *languages.entry(lang).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = languages.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    GitHubProfileMetrics {
        public_repos: user.public_repos,
        total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
        total_forks: repos.iter().map(|r| r.forks_count).sum(),
        followers: user.followers,
        last_commit: repos.iter().filter_map(|r| r.pushed_at).max(),
        account_created: user.created_at,
        top_languages: ranked
            .into_iter()
            .take(TOP_LANGUAGES)
            .map(|(lang, _)| lang.to_string())
            .collect(),
        credibility: credibility(user.public_repos, user.followers, account_age_days),
        username: user.login,
    }
}

/// Repository count, followers and account age, each saturating, weighted .4/.3/.3.
pub fn credibility(public_repos: u64, followers: u64, account_age_days: i64) -> GitHubCredibility {
    let repos = (public_repos as f64 / 10.0).min(1.0);
    let audience = (followers as f64 / 50.0).min(1.0);
    let age = (account_age_days as f64 / 365.0).clamp(0.0, 1.0);
    let confidence = ((repos * 0.4 + audience * 0.3 + age * 0.3) * 100.0).round() / 100.0;
    GitHubCredibility {
        confidence,
        verified: confidence >= VERIFIED_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_target_profile_and_repo() {
        assert_eq!(
            parse_target("https://github.com/octocat").unwrap(),
            GitHubTarget::Profile("octocat".to_string())
        );
        assert_eq!(
            parse_target("https://github.com/octocat/hello.git").unwrap(),
            GitHubTarget::Repository {
                owner: "octocat".to_string(),
                name: "hello".to_string()
            }
        );
        assert!(parse_target("https://github.com").is_err());
        assert!(parse_target("https://github.com/settings/profile").is_err());
    }

    #[test]
    fn test_credibility_saturates() {
        let strong = credibility(40, 500, 3000);
        assert_eq!(strong.confidence, 1.0);
        assert!(strong.verified);
        let fresh = credibility(1, 0, 10);
        assert!(fresh.confidence < 0.1);
        assert!(!fresh.verified);
    }

    #[tokio::test]
    async fn test_fetch_profile_aggregates_repos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "octocat",
                "public_repos": 3,
                "followers": 20,
                "created_at": "2015-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "a", "stargazers_count": 5, "forks_count": 1, "language": "Rust",
                 "pushed_at": "2024-01-01T00:00:00Z", "fork": false},
                {"name": "b", "stargazers_count": 2, "forks_count": 0, "language": "Go",
                 "pushed_at": "2024-03-01T00:00:00Z", "fork": false},
                {"name": "c", "stargazers_count": 0, "forks_count": 0, "language": "Rust",
                 "pushed_at": null, "fork": true}
            ])))
            .mount(&server)
            .await;

        let client = Client::new();
        let base = server.uri();
        let api = GitHubApi {
            client: &client,
            base_url: &base,
            token: Some("tok"),
        };
        let metrics = api.fetch("https://github.com/octocat").await.unwrap();
        let ProfileMetrics::GithubProfile(profile) = metrics else {
            panic!("expected a profile");
        };
        assert_eq!(profile.public_repos, 3);
        assert_eq!(profile.total_stars, 7);
        assert_eq!(profile.total_forks, 1);
        assert_eq!(
            profile.last_commit,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(profile.top_languages, vec!["Go", "Rust"]);
        assert!(profile.credibility.verified);
    }

    #[tokio::test]
    async fn test_fetch_missing_user_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let client = Client::new();
        let base = server.uri();
        let api = GitHubApi {
            client: &client,
            base_url: &base,
            token: None,
        };
        let err = api.fetch("https://github.com/ghost").await.unwrap_err();
        assert!(matches!(err, ScrapeError::NotFound(_)));
    }
}
