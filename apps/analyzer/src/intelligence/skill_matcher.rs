//! Skill Matcher: scores how well a candidate's skills and résumé sections
//! cover a job description.
//!
//! Two scores come out of it:
//! - `skill_alignment`: mean best-match similarity of each JD requirement
//!   against the skill list. Adding skills never lowers it.
//! - `total_score`: fixed weighted sum of per-section similarity to the JD
//!   (weights sum to 100). Used as `overall_alignment` when sections exist.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::intelligence::embedding_client::EmbeddingError;
use crate::intelligence::similarity::{ScorerBackend, SemanticScorer};
use crate::intelligence::structure::round2;
use crate::models::resume::{JobDescription, Resume, SectionName, SkillSet};

/// Points each section contributes to the composite score. Sums to 100.
pub const SECTION_POINTS: &[(SectionName, f64)] = &[
    (SectionName::WorkExperience, 30.0),
    (SectionName::Projects, 30.0),
    (SectionName::Skills, 20.0),
    (SectionName::Education, 10.0),
    (SectionName::Certifications, 5.0),
    (SectionName::Summary, 5.0),
];

const STRONG_MATCH: f64 = 0.8;

static SKILL_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;•\n]").expect("static regex"));

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Strong,
    Partial,
    Missing,
}

/// Best skill found for one JD requirement. `score` is 0–100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementMatch {
    pub requirement: String,
    pub score: f64,
    pub best_skill: Option<String>,
    pub strength: MatchStrength,
}

/// Best requirement any one skill supports. `score` is 0–100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionScore {
    pub section: SectionName,
    /// Section-to-JD similarity, 0–100.
    pub similarity: f64,
    pub score: f64,
    pub max_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillAlignment {
    pub backend: ScorerBackend,
    pub overall_alignment: f64,
    pub skill_alignment: f64,
    pub total_score: f64,
    pub section_scores: Vec<SectionScore>,
    pub requirement_matches: Vec<RequirementMatch>,
    pub skill_matches: Vec<SkillMatch>,
    pub missing_skills: Vec<String>,
    pub candidate_skills: SkillSet,
    pub jd_requirements: Vec<String>,
    pub recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Skill extraction
// ────────────────────────────────────────────────────────────────────────────

/// Splits a skills block into individual skills. Category labels such as
/// "Languages:" are dropped.
pub fn extract_skills(text: &str) -> SkillSet {
    SKILL_SEPARATORS
        .split(text)
        .map(clean_skill)
        .filter(|s| !s.is_empty())
        .collect()
}

fn clean_skill(raw: &str) -> String {
    let piece = raw.trim();
    let piece = piece.rsplit_once(':').map(|(_, rest)| rest).unwrap_or(piece);
    piece
        .trim()
        .trim_start_matches(['-', '*', '◦', '▪', '‣', '–', '●'])
        .trim()
        .trim_end_matches('.')
        .trim()
        .to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Alignment
// ────────────────────────────────────────────────────────────────────────────

pub async fn compute_alignment(
    skills: &SkillSet,
    jd: &JobDescription,
    resume: &Resume,
    scorer: &dyn SemanticScorer,
) -> Result<SkillAlignment, EmbeddingError> {
    let requirements = &jd.requirements;
    let matrix = scorer
        .similarity_matrix(skills.as_slice(), requirements)
        .await?;
    let backend = matrix.backend;
    let threshold = backend.missing_threshold();
    debug!(
        "{backend:?} skill matrix: {} skills x {} requirements",
        matrix.rows(),
        matrix.cols()
    );

    let mut requirement_matches = Vec::with_capacity(requirements.len());
    let mut missing_skills = Vec::new();
    for (j, requirement) in requirements.iter().enumerate() {
        let (best, at) = if skills.is_empty() {
            (0.0, None)
        } else {
            matrix.col_max(j)
        };
        let strength = if best >= STRONG_MATCH {
            MatchStrength::Strong
        } else if best >= threshold {
            MatchStrength::Partial
        } else {
            missing_skills.push(requirement.clone());
            MatchStrength::Missing
        };
        requirement_matches.push(RequirementMatch {
            requirement: requirement.clone(),
            score: round2(best * 100.0),
            best_skill: at
                .filter(|_| best > 0.0)
                .map(|i| skills.as_slice()[i].clone()),
            strength,
        });
    }

    let skill_matches = skills
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, skill)| SkillMatch {
            skill: skill.clone(),
            score: round2(matrix.row_max(i).0 * 100.0),
        })
        .collect();

    let skill_alignment = if requirements.is_empty() || skills.is_empty() {
        0.0
    } else {
        let sum: f64 = (0..requirements.len()).map(|j| matrix.col_max(j).0).sum();
        sum / requirements.len() as f64 * 100.0
    };

    let section_scores = score_sections(resume, &jd.raw_text, scorer).await?;
    let total_score: f64 = section_scores.iter().map(|s| s.score).sum();
    let overall_alignment = if section_scores.is_empty() {
        skill_alignment
    } else {
        total_score
    };

    let recommendation = build_recommendation(overall_alignment, &missing_skills);

    Ok(SkillAlignment {
        backend,
        overall_alignment: round2(overall_alignment),
        skill_alignment: round2(skill_alignment),
        total_score: round2(total_score),
        section_scores,
        requirement_matches,
        skill_matches,
        missing_skills,
        candidate_skills: skills.clone(),
        jd_requirements: requirements.clone(),
        recommendation,
    })
}

/// Similarity of each present weighted section to the whole JD, times its points.
async fn score_sections(
    resume: &Resume,
    jd_text: &str,
    scorer: &dyn SemanticScorer,
) -> Result<Vec<SectionScore>, EmbeddingError> {
    let present: Vec<(SectionName, f64, String)> = SECTION_POINTS
        .iter()
        .filter_map(|&(name, points)| {
            resume
                .section(name)
                .map(|s| (name, points, s.text.clone()))
        })
        .collect();
    if present.is_empty() || jd_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<String> = present.iter().map(|(_, _, t)| t.clone()).collect();
    let matrix = scorer
        .similarity_matrix(&texts, &[jd_text.to_string()])
        .await?;

    Ok(present
        .iter()
        .enumerate()
        .map(|(i, (name, points, _))| {
            let similarity = matrix.row_max(i).0.clamp(0.0, 1.0);
            SectionScore {
                section: *name,
                similarity: round2(similarity * 100.0),
                score: round2(similarity * points),
                max_score: *points,
            }
        })
        .collect())
}

fn build_recommendation(overall: f64, missing: &[String]) -> String {
    let headline = match overall {
        s if s >= 70.0 => "Strong match for this role.",
        s if s >= 50.0 => "Moderate match; a few gaps to close.",
        _ => "Weak match; significant gaps against the job requirements.",
    };
    if missing.is_empty() {
        return headline.to_string();
    }
    let top: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();
    format!("{headline} Focus on: {}.", top.join(", "))
}
