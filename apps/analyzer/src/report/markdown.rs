//! Markdown report for one résumé-vs-job analysis.

use std::fmt::Write;

use crate::intelligence::project_validator::ProjectValidation;
use crate::intelligence::similarity::ScorerBackend;
use crate::intelligence::skill_matcher::SkillAlignment;
use crate::intelligence::structure::StructureReport;
use crate::models::resume::{Resume, SectionName};

const MAX_MISSING_LISTED: usize = 10;
const MAX_SKILLS_TO_DEVELOP: usize = 5;
const TOP_PROJECTS: usize = 3;
const MAX_FLAGGED_LISTED: usize = 5;

/// Sections whose absence gets its own recommendation.
const CORE_SECTIONS: &[SectionName] = &[
    SectionName::Projects,
    SectionName::WorkExperience,
    SectionName::Skills,
    SectionName::Education,
];

pub fn assessment(overall: f64) -> &'static str {
    match overall {
        s if s >= 70.0 => "Strong match",
        s if s >= 50.0 => "Moderate match",
        _ => "Weak match",
    }
}

pub fn render(
    resume: &Resume,
    structure: &StructureReport,
    alignment: &SkillAlignment,
    projects: &ProjectValidation,
) -> String {
    let mut md = String::new();
    let _ = write_report(&mut md, resume, structure, alignment, projects);
    md
}

fn write_report(
    md: &mut String,
    resume: &Resume,
    structure: &StructureReport,
    alignment: &SkillAlignment,
    projects: &ProjectValidation,
) -> std::fmt::Result {
    writeln!(md, "# Resume Analysis Report")?;
    writeln!(md)?;

    writeln!(md, "## Overall Assessment")?;
    writeln!(md)?;
    writeln!(
        md,
        "**Overall Alignment:** {:.1}/100 ({})",
        alignment.overall_alignment,
        assessment(alignment.overall_alignment)
    )?;
    writeln!(md)?;
    writeln!(md, "{}", alignment.recommendation)?;
    writeln!(md)?;

    writeln!(md, "## Resume Structure")?;
    writeln!(md)?;
    writeln!(md, "**Structure Score:** {:.1}/100", structure.score)?;
    writeln!(md)?;
    if !structure.missing_sections.is_empty() {
        writeln!(md, "Missing sections: {}", join_sections(&structure.missing_sections))?;
        writeln!(md)?;
    }
    if !structure.sparse_sections.is_empty() {
        writeln!(md, "Sparse sections: {}", join_sections(&structure.sparse_sections))?;
        writeln!(md)?;
    }

    writeln!(md, "## Skill Alignment")?;
    writeln!(md)?;
    writeln!(
        md,
        "**Requirement Coverage:** {:.1}/100 (similarity backend: {})",
        alignment.skill_alignment,
        backend_name(alignment)
    )?;
    writeln!(md)?;

    if !alignment.section_scores.is_empty() {
        writeln!(md, "### Section Scores")?;
        writeln!(md)?;
        writeln!(md, "| Section | Score | Max |")?;
        writeln!(md, "|---|---|---|")?;
        for s in &alignment.section_scores {
            writeln!(md, "| {} | {:.1} | {:.0} |", s.section, s.score, s.max_score)?;
        }
        writeln!(md)?;
    }

    writeln!(md, "### Missing Skills")?;
    writeln!(md)?;
    if alignment.missing_skills.is_empty() {
        writeln!(md, "No missing skills detected.")?;
    } else {
        for skill in alignment.missing_skills.iter().take(MAX_MISSING_LISTED) {
            writeln!(md, "- {skill}")?;
        }
        let remaining = alignment.missing_skills.len().saturating_sub(MAX_MISSING_LISTED);
        if remaining > 0 {
            writeln!(md, "- ... and {remaining} more")?;
        }
    }
    writeln!(md)?;

    writeln!(md, "## Project Validation")?;
    writeln!(md)?;
    if projects.projects.is_empty() {
        writeln!(md, "No projects found.")?;
        writeln!(md)?;
    } else {
        writeln!(md, "**Average Project Score:** {:.1}/100", projects.average_score)?;
        writeln!(md)?;
        writeln!(md, "### Top Projects")?;
        writeln!(md)?;
        for (i, p) in projects.projects.iter().take(TOP_PROJECTS).enumerate() {
            writeln!(
                md,
                "{}. **{}**: {:.1}/100 (skills {:.0}, depth {:.0}, quantified {:.0})",
                i + 1,
                p.title,
                p.score,
                p.metrics.skill_alignment,
                p.metrics.technical_depth,
                p.metrics.quantifiable_results
            )?;
        }
        writeln!(md)?;
        if !projects.flagged_projects.is_empty() {
            writeln!(md, "### Flagged Projects")?;
            writeln!(md)?;
            for f in projects.flagged_projects.iter().take(MAX_FLAGGED_LISTED) {
                writeln!(md, "- **{}** ({})", f.title, f.reason.describe())?;
            }
            writeln!(md)?;
        }
    }

    writeln!(md, "## Recommendations")?;
    writeln!(md)?;
    let recommendations = recommendations(resume, structure, alignment, projects);
    if recommendations.is_empty() {
        writeln!(md, "No changes recommended.")?;
    } else {
        for (i, r) in recommendations.iter().enumerate() {
            writeln!(md, "{}. {r}", i + 1)?;
        }
    }

    Ok(())
}

/// Ordered, de-duplicated recommendation list.
pub fn recommendations(
    resume: &Resume,
    structure: &StructureReport,
    alignment: &SkillAlignment,
    projects: &ProjectValidation,
) -> Vec<String> {
    let mut out = Vec::new();

    let develop: Vec<&str> = alignment
        .missing_skills
        .iter()
        .take(MAX_SKILLS_TO_DEVELOP)
        .map(String::as_str)
        .collect();
    if !develop.is_empty() {
        out.push(format!("Develop or highlight these skills: {}", develop.join(", ")));
    }

    for name in CORE_SECTIONS {
        if resume.section(*name).is_none() {
            out.push(format!("Add a {name} section"));
        }
    }

    for name in &structure.sparse_sections {
        out.push(format!("Expand the {name} section with more detail"));
    }

    if let Some(gap) = projects.projects.iter().flat_map(|p| p.impact_gaps.iter()).next() {
        out.push(format!("Quantify project results, e.g. \"{}\": {}", gap.line, gap.suggestion));
    }

    out
}

fn join_sections(names: &[SectionName]) -> String {
    names
        .iter()
        .map(|n| n.title())
        .collect::<Vec<_>>()
        .join(", ")
}

fn backend_name(alignment: &SkillAlignment) -> &'static str {
    match alignment.backend {
        ScorerBackend::Embedding => "embeddings",
        ScorerBackend::Tfidf => "TF-IDF",
    }
}
