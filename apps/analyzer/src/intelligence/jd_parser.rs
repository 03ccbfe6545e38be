//! JD Parser: pulls requirement lines out of a raw job description and drops
//! the company / benefits boilerplate around them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::intelligence::sections::{is_bullet, strip_bullet};
use crate::models::resume::JobDescription;

const MAX_REQUIREMENT_WORDS: usize = 30;

static REQUIREMENTS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:requirements|qualifications|skills required|required skills|what you'll need|what you will need|must have)\s*:\s*([\s\S]*?)(?:\n\s*\n|\z)",
    )
    .expect("static regex")
});

static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(about (us|the (role|company|team))|who we are|our (company|mission|team|culture)|benefits|perks|what we offer|we offer|compensation|salary|equal opportunity|we are an equal|eeo|how to apply|to apply|apply (now|today)|location|job type|employment type|start date)\b",
    )
    .expect("static regex")
});

/// Parses a job description into its requirement list.
pub fn parse_job_description(raw_text: &str) -> JobDescription {
    JobDescription {
        raw_text: raw_text.to_string(),
        requirements: extract_requirements(raw_text),
    }
}

/// Requirements block bullets, else its lines; without a block, the JD's
/// bullets, else every line. Boilerplate is filtered out in all cases.
pub fn extract_requirements(jd_text: &str) -> Vec<String> {
    let text = jd_text.replace("\r\n", "\n");

    let candidates: Vec<String> = match requirements_block(&text) {
        Some(block) => {
            let bullets = bullet_lines(&block);
            if bullets.is_empty() {
                plain_lines(&block)
            } else {
                bullets
            }
        }
        None => {
            let bullets = bullet_lines(&text);
            if bullets.is_empty() {
                plain_lines(&text)
            } else {
                bullets
            }
        }
    };

    let mut requirements: Vec<String> = Vec::new();
    for candidate in candidates {
        if is_boilerplate(&candidate) {
            continue;
        }
        let key = candidate.to_lowercase();
        if !requirements.iter().any(|r| r.to_lowercase() == key) {
            requirements.push(candidate);
        }
    }
    requirements
}

fn requirements_block(text: &str) -> Option<String> {
    REQUIREMENTS_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|block| !block.is_empty())
}

fn bullet_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.contains('•') {
            // several "•" items can share one extracted line
            out.extend(line.split('•').skip(1).map(strip_marker));
        } else if is_bullet(line) {
            out.push(strip_marker(line));
        }
    }
    out.retain(|s| !s.is_empty());
    out
}

fn plain_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_marker)
        .filter(|l| !l.is_empty())
        .collect()
}

fn strip_marker(line: &str) -> String {
    strip_bullet(line)
        .trim_end_matches(['.', ';'])
        .trim()
        .to_string()
}

fn is_boilerplate(line: &str) -> bool {
    line.ends_with(':')
        || line.split_whitespace().count() > MAX_REQUIREMENT_WORDS
        || BOILERPLATE.is_match(line)
}
