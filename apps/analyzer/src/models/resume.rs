use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intelligence::impact::ImpactGap;

/// The fixed set of résumé sections the detector recognises.
/// Serialized with the human-readable section title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionName {
    Summary,
    Education,
    #[serde(rename = "Work Experience")]
    WorkExperience,
    Skills,
    Projects,
    Certifications,
    Languages,
    Interests,
    References,
    Publications,
    Awards,
    Volunteer,
}

impl SectionName {
    pub const ALL: [SectionName; 12] = [
        SectionName::Summary,
        SectionName::Education,
        SectionName::WorkExperience,
        SectionName::Skills,
        SectionName::Projects,
        SectionName::Certifications,
        SectionName::Languages,
        SectionName::Interests,
        SectionName::References,
        SectionName::Publications,
        SectionName::Awards,
        SectionName::Volunteer,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionName::Summary => "Summary",
            SectionName::Education => "Education",
            SectionName::WorkExperience => "Work Experience",
            SectionName::Skills => "Skills",
            SectionName::Projects => "Projects",
            SectionName::Certifications => "Certifications",
            SectionName::Languages => "Languages",
            SectionName::Interests => "Interests",
            SectionName::References => "References",
            SectionName::Publications => "Publications",
            SectionName::Awards => "Awards",
            SectionName::Volunteer => "Volunteer",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One extracted résumé block. `present == false` means the detector found nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: SectionName,
    pub text: String,
    pub present: bool,
}

impl Section {
    pub fn new(name: SectionName, text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        let present = !text.is_empty();
        Self {
            name,
            text,
            present,
        }
    }

    pub fn missing(name: SectionName) -> Self {
        Self {
            name,
            text: String::new(),
            present: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub raw_text: String,
    /// One entry per `SectionName::ALL`, in enumeration order.
    pub sections: Vec<Section>,
}

impl Resume {
    pub fn section(&self, name: SectionName) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name && s.present)
    }

    pub fn section_text(&self, name: SectionName) -> &str {
        self.section(name).map(|s| s.text.as_str()).unwrap_or("")
    }
}

/// Flat, order-preserving, case-insensitively unique list of skills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a skill unless an equal one (ignoring case) is already present.
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        let key = skill.to_lowercase();
        if skill.is_empty() || self.0.iter().any(|s| s.to_lowercase() == key) {
            return false;
        }
        self.0.push(skill);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    pub raw_text: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    UnrelatedToClaimedSkills,
    LacksTechnicalDepth,
}

impl FlagReason {
    pub fn describe(&self) -> &'static str {
        match self {
            FlagReason::UnrelatedToClaimedSkills => "Unrelated to claimed skills",
            FlagReason::LacksTechnicalDepth => "Lacks technical depth",
        }
    }
}

/// Per-metric project scores, each on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub skill_alignment: f64,
    pub technical_depth: f64,
    pub quantifiable_results: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredProject {
    pub title: String,
    pub description: String,
    pub score: f64,
    pub metrics: ProjectMetrics,
    pub technologies: Vec<String>,
    pub flag: Option<FlagReason>,
    pub impact_gaps: Vec<ImpactGap>,
}

impl ScoredProject {
    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }
}
