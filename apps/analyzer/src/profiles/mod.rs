//! Résumé Analysis: finds professional profile URLs in a résumé, fetches
//! each profile, and scores how far the profiles back up the résumé.

pub mod certificates;
pub mod explainer;
pub mod fetcher;
mod figma;
mod github;
pub mod handlers;
mod html;
mod leetcode;
mod linkedin;
pub mod metrics;
pub mod platform;
pub mod scorer;
pub mod urls;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::parse_document;
use crate::errors::AnalysisError;
use crate::profiles::certificates::{check_certificates, CertificateReport};
use crate::profiles::explainer::{explain, Explanations, Grade};
use crate::profiles::fetcher::ProfileFetcher;
use crate::profiles::metrics::{FailedProfile, ProfileData};
use crate::profiles::platform::Platform;
use crate::profiles::scorer::{score_card, ScoreCard};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub urls: Vec<String>,
    pub format_issues: Vec<String>,
    pub certificates: CertificateReport,
    pub profiles: Vec<ProfileData>,
    pub failed_profiles: Vec<FailedProfile>,
    #[serde(flatten)]
    pub scores: ScoreCard,
    pub grade: Grade,
    pub explanations: Explanations,
    pub analyzed_at: DateTime<Utc>,
}

pub async fn analyze_resume_text(text: &str, fetcher: &dyn ProfileFetcher) -> ProfileAnalysis {
    analyze_at(text, fetcher, Utc::now()).await
}

/// Fetches every URL in turn; a failed fetch is recorded and the run continues.
pub async fn analyze_at(
    text: &str,
    fetcher: &dyn ProfileFetcher,
    now: DateTime<Utc>,
) -> ProfileAnalysis {
    let urls = urls::extract_urls(text);
    let format_issues = urls::check_format(text);
    let certificates = check_certificates(text);
    info!(
        "Found {} profile URLs and {} certificate links",
        urls.len(),
        certificates.links.len()
    );

    let mut profiles = Vec::new();
    let mut failed_profiles = Vec::new();
    for url in &urls {
        let Some(platform) = Platform::from_url(url) else {
            continue;
        };
        match fetcher.fetch(url).await {
            Ok(data) => profiles.push(data),
            Err(e) => {
                warn!("Could not fetch {url}: {e}");
                failed_profiles.push(FailedProfile {
                    platform,
                    url: url.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let scores = score_card(
        text,
        &urls,
        &format_issues,
        &certificates,
        &profiles,
        &failed_profiles,
        now,
    );
    let grade = Grade::from_score(scores.trust_score);
    let explanations = explain(&scores);
    info!("Trust score {:.2} (grade {grade:?})", scores.trust_score);

    ProfileAnalysis {
        urls,
        format_issues,
        certificates,
        profiles,
        failed_profiles,
        scores,
        grade,
        explanations,
        analyzed_at: now,
    }
}

/// Parses `resume`, analyses it and writes the result as pretty JSON to `output`.
pub async fn run_profile_analysis(
    resume: &Path,
    output: &Path,
    fetcher: &dyn ProfileFetcher,
) -> Result<ProfileAnalysis, AnalysisError> {
    let text = parse_document(resume)?;
    let analysis = analyze_resume_text(&text, fetcher).await;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&analysis)?)?;
    info!("Wrote {}", output.display());
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::profiles::fetcher::ScrapeError;
    use crate::profiles::metrics::{FigmaMetrics, ProfileMetrics};

    /// Serves a fixed Figma file and fails everything else.
    struct FakeFetcher;

    #[async_trait]
    impl ProfileFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<ProfileData, ScrapeError> {
            if url.contains("figma.com") {
                Ok(ProfileData {
                    platform: Platform::Figma,
                    url: url.to_string(),
                    metrics: ProfileMetrics::Figma(FigmaMetrics {
                        project_name: Some("Design Kit".to_string()),
                        likes: 40,
                        views: 900,
                    }),
                })
            } else {
                Err(ScrapeError::AuthWalled(url.to_string()))
            }
        }
    }

    const RESUME: &str = "Jane Doe\nhttps://www.figma.com/@jane\nlinkedin.com/in/jane-doe\n\nSummary\nDesigner and engineer.";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_failed_fetch_is_recorded_and_scored_zero() {
        let analysis = analyze_at(RESUME, &FakeFetcher, now()).await;
        assert_eq!(
            analysis.urls,
            vec!["https://figma.com/@jane", "https://linkedin.com/in/jane-doe"]
        );
        assert_eq!(analysis.profiles.len(), 1);
        assert_eq!(analysis.failed_profiles.len(), 1);
        assert_eq!(analysis.failed_profiles[0].platform, Platform::LinkedIn);

        let linkedin = analysis
            .scores
            .platform_scores
            .iter()
            .find(|p| p.platform == Platform::LinkedIn)
            .unwrap();
        assert_eq!(linkedin.score, 0.0);
        assert!(analysis
            .scores
            .recommendations
            .iter()
            .any(|r| r.starts_with("LinkedIn: Profile could not be verified")));
    }

    #[tokio::test]
    async fn test_output_shape() {
        let analysis = analyze_at(RESUME, &FakeFetcher, now()).await;
        let value = serde_json::to_value(&analysis).unwrap();
        for key in [
            "urls",
            "format_issues",
            "certificates",
            "profiles",
            "failed_profiles",
            "resume_score",
            "platform_scores",
            "trust_flags",
            "recommendations",
            "trust_score",
            "grade",
            "explanations",
            "analyzed_at",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["profiles"][0]["metrics"]["kind"], "figma");
    }

    #[tokio::test]
    async fn test_run_writes_result_file() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("resume.txt");
        std::fs::write(&resume, RESUME).unwrap();
        let output = dir.path().join("out").join("resume_analysis_result.json");

        let analysis = run_profile_analysis(&resume, &output, &FakeFetcher)
            .await
            .unwrap();
        let written: ProfileAnalysis =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.scores.trust_score, analysis.scores.trust_score);
    }

    #[tokio::test]
    async fn test_run_missing_resume_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_profile_analysis(
            &dir.path().join("nope.txt"),
            &dir.path().join("out.json"),
            &FakeFetcher,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Document(_)));
    }
}
