//! Deduction-based scoring of the résumé text and each fetched profile,
//! rolled up into a platform-weighted trust score.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::intelligence::structure::round2;
use crate::profiles::certificates::CertificateReport;
use crate::profiles::metrics::{
    FailedProfile, FigmaMetrics, GitHubProfileMetrics, GitHubRepositoryMetrics,
    LeetCodeProblemMetrics, LeetCodeProfileMetrics, LinkedInMetrics, ProfileData, ProfileMetrics,
};
use crate::profiles::platform::Platform;

const RESUME_WEIGHT: f64 = 0.3;
const STALE_AFTER_DAYS: i64 = 90;
const MIN_WORDS: usize = 100;
const MAX_WORDS: usize = 1000;

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub reason: String,
    pub points: u32,
}

impl Deduction {
    fn new(reason: impl Into<String>, points: u32) -> Self {
        Self {
            reason: reason.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeScore {
    /// 0 – 100.
    pub score: u32,
    pub word_count: usize,
    pub deductions: Vec<Deduction>,
}

/// Score for a single profile URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileScore {
    pub score: f64,
    pub strengths: Vec<String>,
    pub deductions: Vec<Deduction>,
}

/// Averaged score for every URL on one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformScore {
    pub platform: Platform,
    pub score: f64,
    pub weight: f64,
    pub profiles: usize,
    pub strengths: Vec<String>,
    pub deductions: Vec<Deduction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub resume_score: ResumeScore,
    pub platform_scores: Vec<PlatformScore>,
    pub trust_flags: Vec<String>,
    pub recommendations: Vec<String>,
    /// 0 – 100, rounded to two decimals.
    pub trust_score: f64,
}

// ──────────────────────────────────────────────
// Résumé
// ──────────────────────────────────────────────

pub fn score_resume(
    text: &str,
    urls: &[String],
    format_issues: &[String],
    certificates: &CertificateReport,
) -> ResumeScore {
    let mut deductions: Vec<Deduction> = format_issues
        .iter()
        .map(|issue| Deduction::new(issue.clone(), 5))
        .collect();
    if urls.is_empty() {
        deductions.push(Deduction::new("No professional profile URLs found", 10));
    }
    if certificates.listed && certificates.links.is_empty() {
        deductions.push(Deduction::new(
            "Certifications listed without verification links",
            5,
        ));
    }
    for link in certificates.links.iter().filter(|l| l.certificate_id.is_none()) {
        deductions.push(Deduction::new(
            format!("Certificate link has no verifiable ID: {}", link.url),
            5,
        ));
    }

    let word_count = text.split_whitespace().count();
    if word_count < MIN_WORDS {
        deductions.push(Deduction::new("Resume content is too brief", 15));
    } else if word_count > MAX_WORDS {
        deductions.push(Deduction::new("Resume content may be too verbose", 10));
    }

    let lost: u32 = deductions.iter().map(|d| d.points).sum();
    ResumeScore {
        score: 100u32.saturating_sub(lost),
        word_count,
        deductions,
    }
}

// ──────────────────────────────────────────────
// Profiles
// ──────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    strengths: Vec<String>,
    deductions: Vec<Deduction>,
}

impl Tally {
    fn check(&mut self, failed: bool, reason: &str, points: u32, strength: Option<String>) {
        if failed {
            self.deductions.push(Deduction::new(reason, points));
        } else if let Some(strength) = strength {
            self.strengths.push(strength);
        }
    }

    fn finish(self) -> ProfileScore {
        let lost: u32 = self.deductions.iter().map(|d| d.points).sum();
        ProfileScore {
            score: f64::from(100u32.saturating_sub(lost)),
            strengths: self.strengths,
            deductions: self.deductions,
        }
    }
}

pub fn score_profile(data: &ProfileData, now: DateTime<Utc>) -> ProfileScore {
    let mut tally = Tally::default();
    match &data.metrics {
        ProfileMetrics::GithubProfile(m) => github_profile(&mut tally, m, now),
        ProfileMetrics::GithubRepository(m) => github_repository(&mut tally, m, now),
        ProfileMetrics::Linkedin(m) => linkedin(&mut tally, m),
        ProfileMetrics::LeetcodeProfile(m) => leetcode_profile(&mut tally, m),
        ProfileMetrics::LeetcodeProblem(m) => leetcode_problem(&mut tally, m),
        ProfileMetrics::Figma(m) => figma(&mut tally, m),
    }
    tally.finish()
}

fn is_stale(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    last.is_some_and(|t| now - t > Duration::days(STALE_AFTER_DAYS))
}

fn github_profile(tally: &mut Tally, m: &GitHubProfileMetrics, now: DateTime<Utc>) {
    tally.check(
        m.public_repos < 3,
        "Low repository count",
        20,
        Some(format!("{} public repositories", m.public_repos)),
    );
    tally.check(
        m.total_stars < 5,
        "Low number of stars",
        10,
        Some(format!("{} stars across repositories", m.total_stars)),
    );
    tally.check(
        is_stale(m.last_commit, now),
        "No recent GitHub activity",
        15,
        m.last_commit.map(|_| "Recent commit activity".to_string()),
    );
    if !m.top_languages.is_empty() {
        tally
            .strengths
            .push(format!("Works in {}", m.top_languages.join(", ")));
    }
}

fn github_repository(tally: &mut Tally, m: &GitHubRepositoryMetrics, now: DateTime<Utc>) {
    tally.check(
        m.stars < 5,
        "Low number of stars",
        10,
        Some(format!("{}/{} has {} stars", m.owner, m.name, m.stars)),
    );
    tally.check(
        is_stale(m.last_commit, now),
        "No recent GitHub activity",
        15,
        m.last_commit.map(|_| "Repository recently updated".to_string()),
    );
    tally.check(m.description.is_none(), "Repository has no description", 5, None);
}

fn linkedin(tally: &mut Tally, m: &LinkedInMetrics) {
    let completeness = m.profile_completeness.min(100);
    tally.check(
        completeness < 80,
        "Incomplete LinkedIn profile",
        100 - completeness,
        Some(format!("Profile {completeness}% complete")),
    );
    tally.check(
        m.endorsements.len() < 3,
        "Limited skill endorsements",
        10,
        Some(format!("{} endorsed skills", m.endorsements.len())),
    );
}

fn leetcode_profile(tally: &mut Tally, m: &LeetCodeProfileMetrics) {
    if m.solved_problems < 50 {
        tally.check(true, "Low number of solved problems", 20, None);
    } else if m.solved_problems < 100 {
        tally.check(true, "Moderate number of solved problems", 10, None);
    } else {
        tally
            .strengths
            .push(format!("{} problems solved", m.solved_problems));
    }

    if m.acceptance_rate < 50.0 {
        tally.check(true, "Low acceptance rate", 15, None);
    } else if m.acceptance_rate < 70.0 {
        tally.check(true, "Moderate acceptance rate", 5, None);
    } else {
        tally
            .strengths
            .push(format!("{:.1}% acceptance rate", m.acceptance_rate));
    }

    let d = &m.difficulty;
    tally.check(d.easy < 20, "Low number of easy problems solved", 5, None);
    tally.check(d.medium < 10, "Low number of medium problems solved", 10, None);
    tally.check(
        d.hard < 5,
        "Low number of hard problems solved",
        5,
        Some(format!("{} hard problems solved", d.hard)),
    );
    let total = d.easy + d.medium + d.hard;
    let easy_heavy = d.easy > 0
        && d.medium > 0
        && d.hard > 0
        && d.easy as f64 / total as f64 > 0.8;
    tally.check(easy_heavy, "Too many easy problems compared to medium/hard", 5, None);

    tally.check(
        m.recent_activity.is_empty(),
        "No recent activity",
        10,
        Some("Recent accepted submissions".to_string()),
    );

    match m.ranking {
        Some(rank) if rank > 100_000 => tally.check(true, "Low ranking", 5, None),
        Some(rank) if rank > 50_000 => tally.check(true, "Moderate ranking", 2, None),
        Some(rank) => tally.strengths.push(format!("Global ranking {rank}")),
        None => {}
    }
}

fn leetcode_problem(tally: &mut Tally, m: &LeetCodeProblemMetrics) {
    tally.check(
        true,
        "Link points to a single problem rather than a profile",
        30,
        None,
    );
    tally.check(m.title.is_none(), "Problem page could not be identified", 20, None);
}

fn figma(tally: &mut Tally, m: &FigmaMetrics) {
    tally.check(
        m.project_name.is_none(),
        "Figma project has no visible title",
        20,
        m.project_name.as_ref().map(|name| format!("Published project \"{name}\"")),
    );
    tally.check(
        m.likes == 0 && m.views == 0,
        "No community engagement on Figma project",
        10,
        Some(format!("{} likes, {} views", m.likes, m.views)),
    );
}

// ──────────────────────────────────────────────
// Aggregation
// ──────────────────────────────────────────────

/// Averages per-URL scores for each platform, in `Platform::ALL` order.
/// Failed fetches count as zero.
pub fn score_platforms(
    profiles: &[ProfileData],
    failed: &[FailedProfile],
    now: DateTime<Utc>,
) -> Vec<PlatformScore> {
    Platform::ALL
        .into_iter()
        .filter_map(|platform| {
            let mut scores: Vec<ProfileScore> = profiles
                .iter()
                .filter(|p| p.platform == platform)
                .map(|p| score_profile(p, now))
                .collect();
            scores.extend(failed.iter().filter(|f| f.platform == platform).map(|f| {
                ProfileScore {
                    score: 0.0,
                    strengths: Vec::new(),
                    deductions: vec![Deduction::new(
                        format!("Profile could not be verified: {}", f.error),
                        100,
                    )],
                }
            }));
            if scores.is_empty() {
                return None;
            }

            let count = scores.len();
            let average = scores.iter().map(|s| s.score).sum::<f64>() / count as f64;
            let mut strengths = Vec::new();
            let mut deductions: Vec<Deduction> = Vec::new();
            for score in scores {
                for s in score.strengths {
                    if !strengths.contains(&s) {
                        strengths.push(s);
                    }
                }
                for d in score.deductions {
                    if !deductions.iter().any(|e| e.reason == d.reason) {
                        deductions.push(d);
                    }
                }
            }
            Some(PlatformScore {
                platform,
                score: round2(average),
                weight: platform.weight(),
                profiles: count,
                strengths,
                deductions,
            })
        })
        .collect()
}

pub fn trust_flags(urls: &[String], profiles: &[ProfileData]) -> Vec<String> {
    let mut flags = Vec::new();
    if !urls.is_empty() && profiles.is_empty() {
        flags.push("Resume URLs could not be verified against any live profile".to_string());
    }
    for profile in profiles {
        if let ProfileMetrics::GithubProfile(m) = &profile.metrics {
            if m.public_repos > 0 && m.last_commit.is_none() {
                flags.push("GitHub profile shows repositories but no commit history".to_string());
            }
            if !m.credibility.verified {
                flags.push(format!(
                    "GitHub account {} has low credibility ({:.2})",
                    m.username, m.credibility.confidence
                ));
            }
        }
    }
    flags
}

/// Résumé at weight 0.3 plus each scored platform at its own weight,
/// normalised by the weights actually present.
pub fn trust_score(resume: &ResumeScore, platforms: &[PlatformScore]) -> f64 {
    let weighted = f64::from(resume.score) * RESUME_WEIGHT
        + platforms.iter().map(|p| p.score * p.weight).sum::<f64>();
    let total_weight = RESUME_WEIGHT + platforms.iter().map(|p| p.weight).sum::<f64>();
    round2((weighted / total_weight).clamp(0.0, 100.0))
}

pub fn recommendations(
    resume: &ResumeScore,
    platforms: &[PlatformScore],
    flags: &[String],
) -> Vec<String> {
    resume
        .deductions
        .iter()
        .map(|d| format!("Resume: {}", d.reason))
        .chain(platforms.iter().flat_map(|p| {
            p.deductions
                .iter()
                .map(move |d| format!("{}: {}", p.platform, d.reason))
        }))
        .chain(flags.iter().map(|f| format!("Trust: {f}")))
        .collect()
}

pub fn score_card(
    text: &str,
    urls: &[String],
    format_issues: &[String],
    certificates: &CertificateReport,
    profiles: &[ProfileData],
    failed: &[FailedProfile],
    now: DateTime<Utc>,
) -> ScoreCard {
    let resume_score = score_resume(text, urls, format_issues, certificates);
    let platform_scores = score_platforms(profiles, failed, now);
    let trust_flags = trust_flags(urls, profiles);
    let recommendations = recommendations(&resume_score, &platform_scores, &trust_flags);
    let trust_score = trust_score(&resume_score, &platform_scores);
    ScoreCard {
        resume_score,
        platform_scores,
        trust_flags,
        recommendations,
        trust_score,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;

    use super::*;
    use crate::profiles::certificates::check_certificates;
    use crate::profiles::metrics::{DifficultyStats, GitHubCredibility};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn github(repos: u64, stars: u64, last_commit: Option<DateTime<Utc>>) -> ProfileData {
        ProfileData {
            platform: Platform::GitHub,
            url: "https://github.com/jane".to_string(),
            metrics: ProfileMetrics::GithubProfile(GitHubProfileMetrics {
                username: "jane".to_string(),
                public_repos: repos,
                total_stars: stars,
                total_forks: 0,
                followers: 10,
                last_commit,
                account_created: None,
                top_languages: vec!["Rust".to_string()],
                credibility: GitHubCredibility {
                    confidence: 0.7,
                    verified: true,
                },
            }),
        }
    }

    #[test]
    fn test_resume_score_deductions() {
        let no_certs = CertificateReport::default();
        let issues = vec!["Inconsistent line spacing detected".to_string()];
        let score = score_resume(&words(50), &[], &issues, &no_certs);
        // 100 - 5 - 10 - 15
        assert_eq!(score.score, 70);
        assert_eq!(score.deductions.len(), 3);

        let urls = vec!["https://github.com/jane".to_string()];
        let verbose = score_resume(&words(1200), &urls, &[], &no_certs);
        assert_eq!(verbose.score, 90);
        assert_eq!(verbose.deductions[0].reason, "Resume content may be too verbose");
    }

    #[test]
    fn test_resume_score_floors_at_zero() {
        let issues: Vec<String> = (0..30).map(|i| format!("issue {i}")).collect();
        assert_eq!(score_resume("", &[], &issues, &CertificateReport::default()).score, 0);
    }

    #[test]
    fn test_resume_certificate_deductions() {
        let urls = vec!["https://github.com/jane".to_string()];
        let unlinked = CertificateReport {
            listed: true,
            links: Vec::new(),
        };
        let score = score_resume(&words(200), &urls, &[], &unlinked);
        assert_eq!(score.score, 95);
        assert_eq!(
            score.deductions[0].reason,
            "Certifications listed without verification links"
        );

        let text = format!(
            "{} https://coursera.org/verify/ABCD1234EFGH https://coursera.org/verify/abc",
            words(200)
        );
        let linked = check_certificates(&text);
        let score = score_resume(&text, &urls, &[], &linked);
        assert_eq!(score.score, 95);
        assert_eq!(
            score.deductions[0].reason,
            "Certificate link has no verifiable ID: https://coursera.org/verify/abc"
        );
    }

    #[test]
    fn test_github_profile_rules() {
        let stale = now() - Duration::days(200);
        let score = score_profile(&github(1, 0, Some(stale)), now());
        assert_eq!(score.score, 55.0);

        let fresh = now() - Duration::days(5);
        let score = score_profile(&github(10, 40, Some(fresh)), now());
        assert_eq!(score.score, 100.0);
        assert!(score.strengths.iter().any(|s| s == "Works in Rust"));
    }

    #[test]
    fn test_linkedin_completeness_penalty() {
        let data = ProfileData {
            platform: Platform::LinkedIn,
            url: "https://linkedin.com/in/jane".to_string(),
            metrics: ProfileMetrics::Linkedin(LinkedInMetrics {
                profile_completeness: 60,
                headline: None,
                connection_count: None,
                endorsements: BTreeMap::new(),
            }),
        };
        // 100 - 40 - 10
        assert_eq!(score_profile(&data, now()).score, 50.0);
    }

    #[test]
    fn test_leetcode_profile_rules() {
        let data = ProfileData {
            platform: Platform::LeetCode,
            url: "https://leetcode.com/u/jane".to_string(),
            metrics: ProfileMetrics::LeetcodeProfile(LeetCodeProfileMetrics {
                username: "jane".to_string(),
                solved_problems: 80,
                difficulty: DifficultyStats {
                    easy: 70,
                    medium: 8,
                    hard: 2,
                },
                acceptance_rate: 60.0,
                ranking: Some(60_000),
                recent_activity: Vec::new(),
            }),
        };
        // -10 solved, -5 acceptance, -10 medium, -5 hard, -5 easy share, -10 recent, -2 ranking
        assert_eq!(score_profile(&data, now()).score, 53.0);
    }

    #[test]
    fn test_figma_rules() {
        let data = ProfileData {
            platform: Platform::Figma,
            url: "https://figma.com/file/abc".to_string(),
            metrics: ProfileMetrics::Figma(FigmaMetrics {
                project_name: None,
                likes: 0,
                views: 0,
            }),
        };
        assert_eq!(score_profile(&data, now()).score, 70.0);
    }

    #[test]
    fn test_platform_average_includes_failures() {
        let fresh = now() - Duration::days(5);
        let failed = vec![FailedProfile {
            platform: Platform::GitHub,
            url: "https://github.com/ghost".to_string(),
            error: "Profile not found".to_string(),
        }];
        let scores = score_platforms(&[github(10, 40, Some(fresh))], &failed, now());
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 50.0);
        assert_eq!(scores[0].profiles, 2);
        assert!(scores[0].deductions[0]
            .reason
            .starts_with("Profile could not be verified"));
    }

    #[test]
    fn test_trust_score_weights() {
        let resume = ResumeScore {
            score: 80,
            word_count: 300,
            deductions: Vec::new(),
        };
        assert_eq!(trust_score(&resume, &[]), 80.0);

        let github = PlatformScore {
            platform: Platform::GitHub,
            score: 100.0,
            weight: 0.4,
            profiles: 1,
            strengths: Vec::new(),
            deductions: Vec::new(),
        };
        // (24 + 40) / 0.7
        assert_eq!(trust_score(&resume, &[github]), 91.43);
    }

    #[test]
    fn test_trust_flags() {
        let urls = vec!["https://github.com/jane".to_string()];
        assert_eq!(trust_flags(&urls, &[]).len(), 1);
        let flags = trust_flags(&urls, &[github(4, 0, None)]);
        assert_eq!(
            flags,
            vec!["GitHub profile shows repositories but no commit history".to_string()]
        );
        assert!(trust_flags(&[], &[]).is_empty());
    }

    #[test]
    fn test_recommendations_are_prefixed() {
        let card = score_card(
            &words(50),
            &[],
            &[],
            &CertificateReport::default(),
            &[],
            &[],
            now(),
        );
        assert_eq!(
            card.recommendations,
            vec![
                "Resume: No professional profile URLs found".to_string(),
                "Resume: Resume content is too brief".to_string(),
            ]
        );
        assert_eq!(card.trust_score, 75.0);
    }
}
