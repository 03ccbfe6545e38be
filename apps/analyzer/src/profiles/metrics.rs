use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profiles::platform::Platform;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubCredibility {
    /// 0.0 – 1.0 from repository count, followers and account age.
    pub confidence: f64,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubProfileMetrics {
    pub username: String,
    pub public_repos: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub followers: u64,
    pub last_commit: Option<DateTime<Utc>>,
    pub account_created: Option<DateTime<Utc>>,
    pub top_languages: Vec<String>,
    pub credibility: GitHubCredibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubRepositoryMetrics {
    pub owner: String,
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub description: Option<String>,
    pub last_commit: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedInMetrics {
    /// 0 – 100, 20 points per visible profile part.
    pub profile_completeness: u32,
    pub headline: Option<String>,
    pub connection_count: Option<u64>,
    /// Skill name to endorsement count.
    pub endorsements: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeetCodeProfileMetrics {
    pub username: String,
    pub solved_problems: u64,
    pub difficulty: DifficultyStats,
    /// Accepted share of all submissions, 0 – 100.
    pub acceptance_rate: f64,
    pub ranking: Option<u64>,
    pub recent_activity: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeetCodeProblemMetrics {
    pub slug: String,
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub acceptance_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigmaMetrics {
    pub project_name: Option<String>,
    pub likes: u64,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileMetrics {
    GithubProfile(GitHubProfileMetrics),
    GithubRepository(GitHubRepositoryMetrics),
    Linkedin(LinkedInMetrics),
    LeetcodeProfile(LeetCodeProfileMetrics),
    LeetcodeProblem(LeetCodeProblemMetrics),
    Figma(FigmaMetrics),
}

/// Metrics fetched for one résumé URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub platform: Platform,
    pub url: String,
    pub metrics: ProfileMetrics,
}

/// A résumé URL that could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedProfile {
    pub platform: Platform,
    pub url: String,
    pub error: String,
}
