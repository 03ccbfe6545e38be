//! End-to-end résumé-vs-job analysis: parse, segment, match, validate, report.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::parse_document;
use crate::errors::AnalysisError;
use crate::intelligence::embedding_client::EmbeddingError;
use crate::intelligence::jd_parser::parse_job_description;
use crate::intelligence::project_validator::{validate_projects, ProjectValidation};
use crate::intelligence::sections::detect_sections;
use crate::intelligence::similarity::SemanticScorer;
use crate::intelligence::skill_matcher::{compute_alignment, extract_skills, SkillAlignment};
use crate::intelligence::structure::{analyze_structure, StructureReport};
use crate::models::resume::{Section, SectionName};
use crate::report::{charts, markdown};

pub const SECTIONS_FILE: &str = "sections.json";
pub const SKILL_ALIGNMENT_FILE: &str = "skill_alignment.json";
pub const PROJECT_VALIDATION_FILE: &str = "project_validation.json";
pub const REPORT_FILE: &str = "resume_analysis_report.md";
pub const SKILL_CHART_FILE: &str = "skill_alignment.png";
pub const PROJECT_CHART_FILE: &str = "project_validation.png";

/// Contents of `sections.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsDocument {
    pub sections: Vec<Section>,
    pub structure: StructureReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sections: SectionsDocument,
    pub alignment: SkillAlignment,
    pub projects: ProjectValidation,
    pub markdown: String,
}

/// Runs every analysis stage on already-extracted text. No I/O besides the scorer.
pub async fn analyze_texts(
    resume_text: &str,
    jd_text: &str,
    scorer: &dyn SemanticScorer,
) -> Result<AnalysisReport, EmbeddingError> {
    let resume = detect_sections(resume_text);
    let present = resume.sections.iter().filter(|s| s.present).count();
    info!("Detected {present} of {} sections", resume.sections.len());

    let structure = analyze_structure(&resume);
    let jd = parse_job_description(jd_text);
    let skills = extract_skills(resume.section_text(SectionName::Skills));
    info!(
        "Matching {} skills against {} requirements",
        skills.len(),
        jd.requirements.len()
    );

    let alignment = compute_alignment(&skills, &jd, &resume, scorer).await?;
    let projects = validate_projects(resume.section_text(SectionName::Projects), &skills);
    let markdown = markdown::render(&resume, &structure, &alignment, &projects);

    Ok(AnalysisReport {
        sections: SectionsDocument {
            sections: resume.sections,
            structure,
        },
        alignment,
        projects,
        markdown,
    })
}

/// Parses both documents, analyses them, and writes all outputs into `output_dir`.
/// Returns the paths written.
pub async fn run_analysis(
    resume_path: &Path,
    jd_path: &Path,
    output_dir: &Path,
    scorer: &dyn SemanticScorer,
) -> Result<Vec<PathBuf>, AnalysisError> {
    let resume_text = parse_document(resume_path)?;
    let jd_text = parse_document(jd_path)?;
    let report = analyze_texts(&resume_text, &jd_text, scorer).await?;

    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    for (name, json) in [
        (SECTIONS_FILE, serde_json::to_string_pretty(&report.sections)?),
        (SKILL_ALIGNMENT_FILE, serde_json::to_string_pretty(&report.alignment)?),
        (PROJECT_VALIDATION_FILE, serde_json::to_string_pretty(&report.projects)?),
        (REPORT_FILE, report.markdown.clone()),
    ] {
        let path = output_dir.join(name);
        std::fs::write(&path, json)?;
        written.push(path);
    }

    let skill_chart = output_dir.join(SKILL_CHART_FILE);
    match charts::render_skill_alignment(&report.alignment, &skill_chart) {
        Ok(()) => written.push(skill_chart),
        Err(e) => warn!("Skipping {SKILL_CHART_FILE}: {e}"),
    }
    let project_chart = output_dir.join(PROJECT_CHART_FILE);
    match charts::render_project_validation(&report.projects, &project_chart) {
        Ok(()) => written.push(project_chart),
        Err(e) => warn!("Skipping {PROJECT_CHART_FILE}: {e}"),
    }

    info!(
        "Analysis complete: overall alignment {:.1}, {} files in {}",
        report.alignment.overall_alignment,
        written.len(),
        output_dir.display()
    );
    Ok(written)
}
