//! LeetCode profile and problem metrics via the public GraphQL endpoint.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::profiles::fetcher::ScrapeError;
use crate::profiles::metrics::{
    DifficultyStats, LeetCodeProblemMetrics, LeetCodeProfileMetrics, ProfileMetrics,
};
use crate::profiles::platform::path_segments;

const PROFILE_QUERY: &str = r#"query userProfile($username: String!) {
  matchedUser(username: $username) {
    username
    profile { ranking }
    submitStats {
      acSubmissionNum { difficulty count submissions }
      totalSubmissionNum { difficulty count submissions }
    }
  }
  recentAcSubmissionList(username: $username, limit: 10) { title timestamp }
}"#;

const PROBLEM_QUERY: &str = r#"query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) { title difficulty stats }
}"#;

const RESERVED_PATHS: &[&str] = &[
    "problems", "contest", "discuss", "explore", "problemset", "studyplan", "accounts",
    "assessment", "interview", "store",
];

#[derive(Debug, Clone, PartialEq)]
pub enum LeetCodeTarget {
    Profile(String),
    Problem(String),
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserData {
    matched_user: Option<MatchedUser>,
    #[serde(default)]
    recent_ac_submission_list: Option<Vec<RecentSubmission>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedUser {
    username: String,
    profile: Option<UserProfile>,
    submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    ranking: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitStats {
    ac_submission_num: Vec<DifficultyCount>,
    total_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Deserialize)]
struct DifficultyCount {
    difficulty: String,
    count: u64,
    submissions: u64,
}

#[derive(Debug, Deserialize)]
struct RecentSubmission {
    title: String,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<Question>,
}

#[derive(Debug, Deserialize)]
struct Question {
    title: Option<String>,
    difficulty: Option<String>,
    stats: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionStats {
    ac_rate: Option<String>,
}

pub fn parse_target(url: &str) -> Result<LeetCodeTarget, ScrapeError> {
    let segments = path_segments(url);
    match segments.as_slice() {
        [kind, slug, ..] if kind == "problems" => Ok(LeetCodeTarget::Problem(slug.clone())),
        [kind, user, ..] if kind == "u" => Ok(LeetCodeTarget::Profile(user.clone())),
        [user] if !RESERVED_PATHS.contains(&user.to_lowercase().as_str()) => {
            Ok(LeetCodeTarget::Profile(user.clone()))
        }
        _ => Err(ScrapeError::UnsupportedUrl(url.to_string())),
    }
}

pub async fn fetch(
    client: &Client,
    graphql_url: &str,
    url: &str,
) -> Result<ProfileMetrics, ScrapeError> {
    match parse_target(url)? {
        LeetCodeTarget::Profile(username) => {
            let data: UserData =
                query(client, graphql_url, PROFILE_QUERY, json!({ "username": username })).await?;
            let user = data
                .matched_user
                .ok_or_else(|| ScrapeError::NotFound(url.to_string()))?;
            let recent = data.recent_ac_submission_list.unwrap_or_default();
            Ok(ProfileMetrics::LeetcodeProfile(profile_metrics(user, recent)))
        }
        LeetCodeTarget::Problem(slug) => {
            let data: QuestionData =
                query(client, graphql_url, PROBLEM_QUERY, json!({ "titleSlug": slug })).await?;
            let question = data
                .question
                .ok_or_else(|| ScrapeError::NotFound(url.to_string()))?;
            Ok(ProfileMetrics::LeetcodeProblem(LeetCodeProblemMetrics {
                acceptance_rate: question.stats.as_deref().and_then(parse_ac_rate),
                title: question.title,
                difficulty: question.difficulty,
                slug,
            }))
        }
    }
}

async fn query<T: DeserializeOwned>(
    client: &Client,
    graphql_url: &str,
    query: &str,
    variables: Value,
) -> Result<T, ScrapeError> {
    let response = client
        .post(graphql_url)
        .header("Referer", "https://leetcode.com")
        .json(&GraphQlRequest { query, variables })
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            status: status.as_u16(),
            url: graphql_url.to_string(),
        });
    }
    let parsed: GraphQlResponse<T> = response.json().await.map_err(|e| ScrapeError::Parse {
        url: graphql_url.to_string(),
        message: e.to_string(),
    })?;
    parsed.data.ok_or_else(|| ScrapeError::Parse {
        url: graphql_url.to_string(),
        message: "GraphQL response has no data".to_string(),
    })
}

fn profile_metrics(user: MatchedUser, recent: Vec<RecentSubmission>) -> LeetCodeProfileMetrics {
    let accepted = |difficulty: &str| {
        user.submit_stats
            .ac_submission_num
            .iter()
            .find(|d| d.difficulty == difficulty)
    };
    let total_all = user
        .submit_stats
        .total_submission_num
        .iter()
        .find(|d| d.difficulty == "All")
        .map(|d| d.submissions)
        .unwrap_or(0);
    let accepted_all = accepted("All").map(|d| d.submissions).unwrap_or(0);
    let acceptance_rate = if total_all == 0 {
        0.0
    } else {
        (accepted_all as f64 / total_all as f64 * 10_000.0).round() / 100.0
    };

    LeetCodeProfileMetrics {
        solved_problems: accepted("All").map(|d| d.count).unwrap_or(0),
        difficulty: DifficultyStats {
            easy: accepted("Easy").map(|d| d.count).unwrap_or(0),
            medium: accepted("Medium").map(|d| d.count).unwrap_or(0),
            hard: accepted("Hard").map(|d| d.count).unwrap_or(0),
        },
        acceptance_rate,
        ranking: user.profile.as_ref().and_then(|p| p.ranking),
        recent_activity: recent.into_iter().map(|s| s.title).collect(),
        username: user.username,
    }
}

/// `stats` is a JSON string such as `{"acRate": "53.2%"}`.
fn parse_ac_rate(stats: &str) -> Option<f64> {
    let stats: QuestionStats = serde_json::from_str(stats).ok()?;
    stats.ac_rate?.trim_end_matches('%').trim().parse().ok()
}
