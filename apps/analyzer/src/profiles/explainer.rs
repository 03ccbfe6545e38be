//! Plain-language explanations of a score card.

use serde::{Deserialize, Serialize};

use crate::profiles::platform::Platform;
use crate::profiles::scorer::{PlatformScore, ResumeScore, ScoreCard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Grade::A,
            s if s >= 80.0 => Grade::B,
            s if s >= 70.0 => Grade::C,
            s if s >= 60.0 => Grade::D,
            _ => Grade::F,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformExplanation {
    pub platform: Platform,
    pub importance: String,
    pub score: f64,
    pub assessment: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanations {
    pub overall: String,
    pub resume: String,
    pub platforms: Vec<PlatformExplanation>,
    pub trust: String,
}

pub fn explain(card: &ScoreCard) -> Explanations {
    Explanations {
        overall: overall(card.trust_score).to_string(),
        resume: resume(&card.resume_score),
        platforms: card.platform_scores.iter().map(platform).collect(),
        trust: trust(&card.trust_flags),
    }
}

fn overall(score: f64) -> &'static str {
    match score {
        s if s >= 85.0 => {
            "Exceptional candidate with strong technical skills and professional presence"
        }
        s if s >= 70.0 => "Strong candidate with solid technical foundation",
        s if s >= 60.0 => "Competent candidate with room for growth",
        _ => "Entry-level candidate requiring development",
    }
}

fn resume(score: &ResumeScore) -> String {
    let mut text = format!(
        "Resume Score: {}/100 ({} words)",
        score.score, score.word_count
    );
    if !score.deductions.is_empty() {
        text.push_str("\nAreas for improvement:");
        for d in &score.deductions {
            text.push_str(&format!("\n- {} (-{})", d.reason, d.points));
        }
    }
    text
}

fn importance(platform: Platform) -> &'static str {
    match platform {
        Platform::GitHub => "Critical - Technical implementation skills",
        Platform::LinkedIn => "Medium - Professional networking",
        Platform::LeetCode => "High - Algorithmic problem-solving",
        Platform::Figma => "Medium - Creative capabilities",
    }
}

fn platform(score: &PlatformScore) -> PlatformExplanation {
    let assessment = match score.score {
        s if s >= 85.0 => "Shows exceptional capability",
        s if s >= 70.0 => "Demonstrates strong proficiency",
        s if s >= 60.0 => "Shows basic competency",
        _ => "Needs improvement",
    };
    PlatformExplanation {
        platform: score.platform,
        importance: importance(score.platform).to_string(),
        score: score.score,
        assessment: assessment.to_string(),
        strengths: score.strengths.clone(),
        concerns: score.deductions.iter().map(|d| d.reason.clone()).collect(),
    }
}

fn trust(flags: &[String]) -> String {
    if flags.is_empty() {
        return "No trustworthiness issues identified".to_string();
    }
    let mut text = "Trustworthiness concerns:".to_string();
    for flag in flags {
        text.push_str(&format!("\n- {flag}"));
    }
    text
}
