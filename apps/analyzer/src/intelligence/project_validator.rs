//! Project Validator: checks that each listed project shows technical depth
//! and uses the skills the candidate claims.

use serde::{Deserialize, Serialize};

use crate::intelligence::impact;
use crate::intelligence::sections::{is_bullet, strip_bullet};
use crate::intelligence::structure::round2;
use crate::intelligence::tfidf;
use crate::models::resume::{FlagReason, ProjectMetrics, ScoredProject, SkillSet};

const FLAG_THRESHOLD: f64 = 0.4;
const UNRELATED_THRESHOLD: f64 = 0.3;
const DEPTH_WEIGHT: f64 = 0.4;
const RELEVANCE_WEIGHT: f64 = 0.6;
const EXACT_WEIGHT: f64 = 0.7;
const SEMANTIC_WEIGHT: f64 = 0.3;
/// Mentioning this many claimed skills earns full exact-match credit.
const SKILL_MENTION_TARGET: usize = 3;
const DEPTH_SATURATION: f64 = 5.0;
const MAX_TITLE_WORDS: usize = 12;

const TECH_KEYWORDS: &[(&str, f64)] = &[
    ("architecture", 1.5),
    ("algorithm", 1.5),
    ("optimized", 1.3),
    ("engineered", 1.3),
    ("deployed", 1.2),
    ("scaled", 1.2),
    ("distributed", 1.2),
    ("parallelized", 1.2),
    ("containerized", 1.2),
    ("automated", 1.1),
    ("api", 1.0),
    ("database", 1.0),
    ("backend", 1.0),
    ("frontend", 1.0),
    ("microservice", 1.0),
    ("pipeline", 1.0),
    ("framework", 1.0),
    ("cloud", 1.0),
    ("machine learning", 1.0),
    ("model", 1.0),
    ("scalable", 1.0),
    ("performance", 1.0),
    ("latency", 1.0),
    ("concurren", 1.0),
    ("cache", 1.0),
    ("security", 1.0),
    ("testing", 1.0),
    ("ci/cd", 1.0),
    ("infrastructure", 1.0),
    ("real-time", 1.0),
];

const ACTION_VERBS: &[&str] = &[
    "analyzed", "architected", "automated", "built", "containerized", "created", "deployed",
    "designed", "developed", "engineered", "implemented", "integrated", "launched", "led",
    "migrated", "optimized", "parallelized", "refactored", "reduced", "scaled", "shipped",
    "trained", "wrote", "improved", "increased", "maintained", "tested",
];

const KNOWN_TECH: &[&str] = &[
    "rust", "python", "java", "javascript", "typescript", "go", "golang", "c", "c++", "c#",
    "kotlin", "swift", "ruby", "php", "scala", "sql", "html", "css", "react", "angular", "vue",
    "node.js", "express", "django", "flask", "fastapi", "spring", "docker", "kubernetes", "aws",
    "gcp", "azure", "postgresql", "postgres", "mysql", "mongodb", "redis", "kafka", "graphql",
    "rest", "grpc", "tensorflow", "pytorch", "keras", "scikit-learn", "pandas", "numpy",
    "spark", "hadoop", "terraform", "ansible", "linux", "git", "opencv", "nlp", "llm",
    "tokio", "axum", "webassembly", "wasm", "elasticsearch", "rabbitmq", "nginx", "jenkins",
];

/// A project as found in the résumé, before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCandidate {
    pub title: String,
    pub lines: Vec<String>,
}

impl ProjectCandidate {
    fn description(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedProject {
    pub title: String,
    pub score: f64,
    pub reason: FlagReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectValidation {
    pub projects: Vec<ScoredProject>,
    pub flagged_projects: Vec<FlaggedProject>,
    pub average_score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

pub fn extract_projects(text: &str) -> Vec<ProjectCandidate> {
    let mut projects: Vec<ProjectCandidate> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let has_current = !projects.is_empty();
        if is_bullet(line) {
            if let Some(current) = projects.last_mut() {
                current.lines.push(strip_bullet(line));
            }
            continue;
        }
        if line.ends_with(':') {
            projects.push(ProjectCandidate {
                title: line.trim_end_matches(':').trim().to_string(),
                lines: Vec::new(),
            });
            continue;
        }
        // "Tech stack: Rust, Kafka" under a title is detail, not a new project.
        let labelled = line
            .split_once(':')
            .is_some_and(|(label, _)| label.split_whitespace().count() <= 3);
        let short = line.split_whitespace().count() <= MAX_TITLE_WORDS && !line.ends_with('.');
        if short && !(labelled && has_current) {
            projects.push(ProjectCandidate {
                title: line.to_string(),
                lines: Vec::new(),
            });
        } else if let Some(current) = projects.last_mut() {
            current.lines.push(line.to_string());
        }
    }

    projects.retain(|p| !p.lines.is_empty());
    if !projects.is_empty() {
        return projects;
    }

    text.lines()
        .map(str::trim)
        .filter(|l| is_bullet(l))
        .enumerate()
        .map(|(i, line)| ProjectCandidate {
            title: format!("Project {}", i + 1),
            lines: vec![strip_bullet(line)],
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores every project in `projects_text` against the claimed `skills`.
pub fn validate_projects(projects_text: &str, skills: &SkillSet) -> ProjectValidation {
    let mut projects: Vec<ScoredProject> = extract_projects(projects_text)
        .iter()
        .map(|candidate| score_project(candidate, skills))
        .collect();
    projects.sort_by(|a, b| b.score.total_cmp(&a.score));

    let flagged_projects = projects
        .iter()
        .filter_map(|p| {
            p.flag.map(|reason| FlaggedProject {
                title: p.title.clone(),
                score: p.score,
                reason,
            })
        })
        .collect();

    let average_score = if projects.is_empty() {
        0.0
    } else {
        round2(projects.iter().map(|p| p.score).sum::<f64>() / projects.len() as f64)
    };

    ProjectValidation {
        projects,
        flagged_projects,
        average_score,
    }
}

pub fn score_project(candidate: &ProjectCandidate, skills: &SkillSet) -> ScoredProject {
    let description = candidate.description();
    let lower = description.to_lowercase();

    let (technologies, pairs) = action_tech_pairs(&description);

    let keyword_score: f64 = TECH_KEYWORDS
        .iter()
        .filter(|(kw, _)| lower.contains(kw))
        .map(|(_, weight)| weight)
        .sum();
    let depth = ((keyword_score + pairs as f64 / 2.0) / DEPTH_SATURATION).min(1.0);

    let relevance = skill_relevance(&lower, &technologies, skills);

    let line_refs: Vec<&str> = candidate.lines.iter().map(String::as_str).collect();
    let quantification = impact::summarize(&line_refs);

    let overall = DEPTH_WEIGHT * depth + RELEVANCE_WEIGHT * relevance;
    let flag = (overall < FLAG_THRESHOLD).then(|| {
        if relevance < UNRELATED_THRESHOLD {
            FlagReason::UnrelatedToClaimedSkills
        } else {
            FlagReason::LacksTechnicalDepth
        }
    });

    ScoredProject {
        title: candidate.title.clone(),
        description,
        score: round2(overall * 100.0),
        metrics: ProjectMetrics {
            skill_alignment: round2(relevance * 100.0),
            technical_depth: round2(depth * 100.0),
            quantifiable_results: round2(quantification.ratio * 100.0),
        },
        technologies,
        flag,
        impact_gaps: quantification.gaps,
    }
}

/// Technologies mentioned and the number of (action verb, technology) pairs,
/// counted sentence by sentence.
fn action_tech_pairs(description: &str) -> (Vec<String>, usize) {
    let mut technologies: Vec<String> = Vec::new();
    let mut pairs = 0;

    for sentence in description.split(['\n', '.', '!', '?', ';']) {
        let tokens: Vec<&str> = sentence
            .split(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '/' | ':'))
            .map(|t| t.trim_matches(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#'))))
            .filter(|t| !t.is_empty())
            .collect();

        let verbs = tokens
            .iter()
            .filter(|t| ACTION_VERBS.contains(&t.to_lowercase().as_str()))
            .count();
        let techs: Vec<&str> = tokens
            .iter()
            .enumerate()
            .filter(|(pos, t)| is_technology(t, *pos))
            .map(|(_, t)| *t)
            .collect();

        pairs += verbs * techs.len();
        for tech in techs {
            if !technologies.iter().any(|t| t.eq_ignore_ascii_case(tech)) {
                technologies.push(tech.to_string());
            }
        }
    }

    (technologies, pairs)
}

fn is_technology(token: &str, position: usize) -> bool {
    let lower = token.to_lowercase();
    if KNOWN_TECH.contains(&lower.as_str()) {
        return true;
    }
    if ACTION_VERBS.contains(&lower.as_str()) || token.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let has_symbol = token.contains(['+', '#']);
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    let has_alpha = token.chars().any(char::is_alphabetic);
    let capitalised = token.chars().next().is_some_and(char::is_uppercase) && token.len() > 1;
    (has_alpha && (has_symbol || has_digit)) || (position > 0 && capitalised)
}

fn skill_relevance(description_lower: &str, technologies: &[String], skills: &SkillSet) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let mentioned = skills
        .as_slice()
        .iter()
        .filter(|s| mentions(description_lower, &s.to_lowercase()))
        .count();
    let target = SKILL_MENTION_TARGET.min(skills.len());
    let exact = (mentioned as f64 / target as f64).min(1.0);

    let semantic = if technologies.is_empty() {
        0.0
    } else {
        let rows = tfidf::similarity_rows(technologies, skills.as_slice());
        rows.iter()
            .map(|row| row.iter().copied().fold(0.0, f64::max))
            .sum::<f64>()
            / technologies.len() as f64
    };

    EXACT_WEIGHT * exact + SEMANTIC_WEIGHT * semantic
}

/// Whole-word containment that also works for "c++" and "node.js".
fn mentions(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> SkillSet {
        items.iter().copied().collect()
    }

    const PROJECTS: &str = "Ledger Service
- Architected a distributed ledger in Rust on Kubernetes, cutting latency by 40%
- Deployed with Docker and automated CI pipelines
Weather App:
- Made a small weather page";

    #[test]
    fn test_extract_projects_titles_and_bullets() {
        let projects = extract_projects(PROJECTS);
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Ledger Service");
        assert_eq!(projects[0].lines.len(), 2);
        assert_eq!(projects[1].title, "Weather App");
        assert_eq!(projects[1].lines, vec!["Made a small weather page"]);
    }

    #[test]
    fn test_labelled_detail_line_stays_with_project() {
        let projects = extract_projects("Ledger\nTech stack: Rust, Kafka\n- Built it");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].lines, vec!["Tech stack: Rust, Kafka", "Built it"]);
    }

    #[test]
    fn test_bullet_fallback_numbers_projects() {
        let projects = extract_projects("- Built a compiler in Rust\n- Wrote a ray tracer");
        // leading bullets have no title to attach to
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Project 1");
        assert_eq!(projects[1].lines, vec!["Wrote a ray tracer"]);
    }

    #[test]
    fn test_titles_without_description_are_dropped() {
        let projects = extract_projects("Lonely Title\nAnother Title\n- Did a thing in Rust");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Another Title");
    }

    #[test]
    fn test_strong_project_is_not_flagged() {
        let result = validate_projects(PROJECTS, &skills(&["Rust", "Kubernetes", "Docker"]));
        let ledger = result
            .projects
            .iter()
            .find(|p| p.title == "Ledger Service")
            .unwrap();
        assert!(ledger.flag.is_none());
        assert_eq!(ledger.metrics.technical_depth, 100.0);
        assert!(ledger.score >= 80.0);
        assert!(ledger.technologies.iter().any(|t| t == "Rust"));
        assert_eq!(ledger.metrics.quantifiable_results, 50.0);
        assert_eq!(ledger.impact_gaps.len(), 1);
    }

    #[test]
    fn test_unrelated_project_is_flagged() {
        let result = validate_projects(
            "Bake Sale\n- Organized a bake sale for the neighbourhood",
            &skills(&["Rust"]),
        );
        assert_eq!(result.flagged_projects.len(), 1);
        assert_eq!(
            result.flagged_projects[0].reason,
            FlagReason::UnrelatedToClaimedSkills
        );
    }

    #[test]
    fn test_shallow_project_is_flagged_for_depth() {
        let result = validate_projects(
            "Rust Notes\n- Wrote notes about Rust",
            &skills(&["Rust", "Go", "Python", "Java"]),
        );
        let project = &result.projects[0];
        assert_eq!(project.flag, Some(FlagReason::LacksTechnicalDepth));
    }

    #[test]
    fn test_projects_sorted_by_score_and_averaged() {
        let result = validate_projects(PROJECTS, &skills(&["Rust", "Kubernetes", "Docker"]));
        assert!(result.projects[0].score >= result.projects[1].score);
        let mean = (result.projects[0].score + result.projects[1].score) / 2.0;
        assert!((result.average_score - mean).abs() < 0.01);
    }

    #[test]
    fn test_empty_projects_text() {
        let result = validate_projects("", &skills(&["Rust"]));
        assert!(result.projects.is_empty());
        assert_eq!(result.average_score, 0.0);
    }

    #[test]
    fn test_mentions_respects_word_boundaries() {
        assert!(mentions("built in c++ and go", "c++"));
        assert!(mentions("node.js backend", "node.js"));
        assert!(!mentions("golang service", "go"));
    }

    #[test]
    fn test_is_technology_heuristics() {
        assert!(is_technology("Rust", 0));
        assert!(is_technology("EC2", 0));
        assert!(is_technology("Kafka", 3));
        assert!(!is_technology("Built", 0));
        assert!(!is_technology("40", 2));
        assert!(!is_technology("Made", 0));
    }
}
