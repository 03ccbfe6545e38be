//! Structure Analyzer: scores a parsed résumé on which weighted sections it
//! has, how filled they are, and which extra sections earn a bonus.

use serde::{Deserialize, Serialize};

use crate::models::resume::{Resume, SectionName};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: SectionName,
    /// Share of this section's weight earned, 0–100.
    pub score: f64,
    pub length: usize,
    pub min_length: usize,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureReport {
    /// 0–100, capped.
    pub score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<SectionName>,
    pub sparse_sections: Vec<SectionName>,
    pub bonus_sections: Vec<SectionName>,
}

/// (section, weight, minimum useful length in characters)
const EXPECTED_SECTIONS: &[(SectionName, f64, usize)] = &[
    (SectionName::Summary, 0.10, 100),
    (SectionName::Education, 0.15, 100),
    (SectionName::WorkExperience, 0.25, 200),
    (SectionName::Skills, 0.20, 100),
    (SectionName::Projects, 0.15, 150),
    (SectionName::Certifications, 0.05, 50),
    (SectionName::Languages, 0.05, 30),
    (SectionName::Interests, 0.05, 30),
];

const BONUS_MIN_LENGTH: usize = 100;
const BONUS_POINTS: f64 = 2.0;

/// Scores the résumé layout: which expected sections exist and whether they
/// carry enough content.
pub fn analyze_structure(resume: &Resume) -> StructureReport {
    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut sparse_sections = Vec::new();
    let mut earned = 0.0;

    for &(name, weight, min_length) in EXPECTED_SECTIONS {
        let length = resume.section_text(name).chars().count();

        if length == 0 {
            missing_sections.push(name);
            sections.push(SectionHealth {
                section: name,
                score: 0.0,
                length: 0,
                min_length,
                status: SectionStatus::Missing,
                recommendations: vec![format!("Add a {name} section")],
            });
            continue;
        }

        let fill = (length as f64 / min_length as f64).min(1.0);
        earned += weight * fill;

        let status = match fill {
            f if f >= 1.0 => SectionStatus::Strong,
            f if f >= 0.5 => SectionStatus::Moderate,
            _ => SectionStatus::Weak,
        };

        let mut recommendations = Vec::new();
        if fill < 1.0 {
            sparse_sections.push(name);
            recommendations.push(format!(
                "Expand the {name} section: {length} characters, at least {min_length} expected"
            ));
        }

        sections.push(SectionHealth {
            section: name,
            score: round2(fill * 100.0),
            length,
            min_length,
            status,
            recommendations,
        });
    }

    let bonus_sections: Vec<SectionName> = resume
        .sections
        .iter()
        .filter(|s| s.present)
        .filter(|s| !EXPECTED_SECTIONS.iter().any(|(name, _, _)| *name == s.name))
        .filter(|s| s.text.chars().count() > BONUS_MIN_LENGTH)
        .map(|s| s.name)
        .collect();

    let score = (earned * 100.0 + bonus_sections.len() as f64 * BONUS_POINTS).min(100.0);

    StructureReport {
        score: round2(score),
        sections,
        missing_sections,
        sparse_sections,
        bonus_sections,
    }
}

/// Rounds to two decimals; a result of zero is always +0.0.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Section;

    fn resume_with(parts: &[(SectionName, usize)]) -> Resume {
        let sections = SectionName::ALL
            .iter()
            .map(|name| match parts.iter().find(|(n, _)| n == name) {
                Some((_, len)) => Section::new(*name, "x".repeat(*len)),
                None => Section::missing(*name),
            })
            .collect();
        Resume {
            raw_text: String::new(),
            sections,
        }
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let report = analyze_structure(&resume_with(&[]));
        assert_eq!(report.score, 0.0);
        assert_eq!(report.missing_sections.len(), EXPECTED_SECTIONS.len());
        assert!(report
            .sections
            .iter()
            .all(|s| s.status == SectionStatus::Missing));
    }

    #[test]
    fn test_full_resume_scores_hundred() {
        let parts: Vec<(SectionName, usize)> = EXPECTED_SECTIONS
            .iter()
            .map(|(name, _, min)| (*name, *min))
            .collect();
        let report = analyze_structure(&resume_with(&parts));
        assert_eq!(report.score, 100.0);
        assert!(report.missing_sections.is_empty());
        assert!(report.sparse_sections.is_empty());
    }

    #[test]
    fn test_sparse_section_earns_partial_weight() {
        // Work Experience at half its minimum length: 0.25 * 0.5 = 12.5 points.
        let report = analyze_structure(&resume_with(&[(SectionName::WorkExperience, 100)]));
        assert_eq!(report.score, 12.5);
        assert_eq!(report.sparse_sections, vec![SectionName::WorkExperience]);
        let health = report
            .sections
            .iter()
            .find(|s| s.section == SectionName::WorkExperience)
            .unwrap();
        assert_eq!(health.status, SectionStatus::Moderate);
        assert_eq!(health.score, 50.0);
    }

    #[test]
    fn test_bonus_for_unexpected_sections() {
        let report = analyze_structure(&resume_with(&[
            (SectionName::Skills, 100),
            (SectionName::Publications, 150),
            (SectionName::Awards, 50),
        ]));
        assert_eq!(report.bonus_sections, vec![SectionName::Publications]);
        assert_eq!(report.score, 22.0);
    }

    #[test]
    fn test_score_is_capped_at_hundred() {
        let mut parts: Vec<(SectionName, usize)> = EXPECTED_SECTIONS
            .iter()
            .map(|(name, _, min)| (*name, *min))
            .collect();
        parts.push((SectionName::Publications, 500));
        parts.push((SectionName::Awards, 500));
        let report = analyze_structure(&resume_with(&parts));
        assert_eq!(report.score, 100.0);
        assert_eq!(report.bonus_sections.len(), 2);
    }

    #[test]
    fn test_round2_never_yields_negative_zero() {
        assert_eq!(round2(1.23456), 1.23);
        assert!(round2(-0.0).is_sign_positive());
        assert!(round2(-0.000001).is_sign_positive());
    }
}
