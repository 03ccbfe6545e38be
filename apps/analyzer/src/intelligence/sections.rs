//! Section Detector: segments résumé text into the fixed set of named sections.
//!
//! Headers are found by keyword plus layout cues (colon, capitalisation,
//! isolation). When nothing looks like a header, formatting-only headers and
//! then keyword sentences are used instead.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::resume::{Resume, Section, SectionName};

const SECTION_KEYWORDS: &[(SectionName, &[&str])] = &[
    (SectionName::Summary, &["summary", "profile", "objective", "about me"]),
    (
        SectionName::Education,
        &["education", "academic", "degree", "university", "college"],
    ),
    (
        SectionName::WorkExperience,
        &["experience", "work", "employment", "job", "career", "professional"],
    ),
    (
        SectionName::Skills,
        &[
            "skills",
            "expertise",
            "competencies",
            "proficiencies",
            "technical",
            "technologies",
        ],
    ),
    (
        SectionName::Projects,
        &["projects", "portfolio", "works", "assignments"],
    ),
    (
        SectionName::Certifications,
        &["certifications", "certificates", "credentials", "qualifications"],
    ),
    (SectionName::Languages, &["languages", "language proficiency"]),
    (SectionName::Interests, &["interests", "hobbies", "activities"]),
    (SectionName::References, &["references", "referees"]),
    (
        SectionName::Publications,
        &["publications", "papers", "articles", "research"],
    ),
    (
        SectionName::Awards,
        &["awards", "honors", "achievements", "recognitions"],
    ),
    (SectionName::Volunteer, &["volunteer", "community", "service"]),
];

/// Cue words for sentence-level grouping when a résumé has no headers at all.
const CONTENT_KEYWORDS: &[(SectionName, &str)] = &[
    (
        SectionName::Skills,
        r"(?i)\b(skills?|proficient|familiar with|knowledge of|expertise|programming languages?)\b",
    ),
    (
        SectionName::Education,
        r"(?i)\b(university|college|bachelor'?s?|master'?s?|ph\.?d|degree|gpa|graduated)\b",
    ),
    (
        SectionName::WorkExperience,
        r"(?i)\b(worked|employed|intern(ship)?|engineer at|developer at|responsible for|company)\b",
    ),
    (
        SectionName::Projects,
        r"(?i)\b(projects?|built|developed|implemented|created)\b",
    ),
];

const HEADER_CONNECTORS: &[&str] = &["and", "of", "my", "other", "key", "relevant"];

const BULLET_MARKERS: &[char] = &['•', '-', '*', '◦', '▪', '‣', '–', '●'];

static SECTION_PATTERNS: Lazy<Vec<(SectionName, Regex)>> = Lazy::new(|| {
    SECTION_KEYWORDS
        .iter()
        .filter_map(|(name, words)| {
            let alternation = words.join("|");
            Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                .ok()
                .map(|re| (*name, re))
        })
        .collect()
});

static CONTENT_PATTERNS: Lazy<Vec<(SectionName, Regex)>> = Lazy::new(|| {
    CONTENT_KEYWORDS
        .iter()
        .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (*name, re)))
        .collect()
});

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex"));
static EXCESS_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("static regex"));
static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+|\n+").expect("static regex"));
static INLINE_SKILLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bskills[:\s]*(.*?)(?:\n\n|\z)").expect("static regex"));

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

/// Detects every section of `raw_text`. The returned `Resume` lists all
/// `SectionName::ALL` members; undetected ones have `present == false`.
pub fn detect_sections(raw_text: &str) -> Resume {
    let text = preprocess(raw_text);
    let lines: Vec<&str> = text.lines().collect();

    let mut found = split_by_headers(&lines, find_headers(&lines));

    if found.is_empty() {
        debug!("no keyword headers found, trying formatting-only headers");
        found = split_by_headers(&lines, find_formatting_headers(&lines));
    }
    if found.is_empty() {
        debug!("no formatting headers found, grouping keyword sentences");
        found = group_keyword_sentences(&text);
    }
    if !found.contains_key(&SectionName::Skills) {
        if let Some(skills) = inline_skills(&text) {
            found.insert(SectionName::Skills, skills);
        }
    }

    let sections = SectionName::ALL
        .iter()
        .map(|name| match found.get(name) {
            Some(body) => Section::new(*name, body.as_str()),
            None => Section::missing(*name),
        })
        .collect();

    Resume {
        raw_text: raw_text.to_string(),
        sections,
    }
}

/// Normalises line endings and whitespace before detection.
pub fn preprocess(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = EXCESS_SPACES.replace_all(&text, " ");
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Maps a header-like line to a section. When several keywords match, the one
/// that starts last wins ("Academic Projects" is Projects).
pub fn classify_header(line: &str) -> Option<SectionName> {
    SECTION_PATTERNS
        .iter()
        .filter_map(|(name, re)| re.find_iter(line).last().map(|m| (m.start(), *name)))
        .max_by_key(|(start, _)| *start)
        .map(|(_, name)| name)
}

// ────────────────────────────────────────────────────────────────────────────
// Header detection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Header {
    line: usize,
    section: SectionName,
    inline: Option<String>,
}

fn find_headers(lines: &[&str]) -> Vec<Header> {
    let mut headers: Vec<Header> = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_bullet(line) {
            continue;
        }
        let (label, inline) = split_inline(line);
        let Some(section) = classify_header(label) else {
            continue;
        };
        if !is_header_phrase(label) {
            continue;
        }

        let previous = headers.last();
        // "Languages: Python, Go" inside a skills block is a skill line.
        if inline.is_some() && previous.map(|h| h.section) == Some(SectionName::Skills) {
            continue;
        }
        // A header needs a body; a keyword line right under one belongs to it.
        if previous.is_some_and(|h| h.line + 1 == idx && h.inline.is_none()) {
            continue;
        }

        if looks_like_header(lines, idx, label, inline.is_some()) {
            headers.push(Header {
                line: idx,
                section,
                inline,
            });
        }
    }

    headers
}

/// Header labels are short and made almost entirely of section keywords
/// ("Technical Skills", "Honors & Awards"), unlike "B.Sc. Computer Science".
fn is_header_phrase(label: &str) -> bool {
    let words: Vec<String> = label
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() || words.len() > 5 {
        return false;
    }
    let foreign = words
        .iter()
        .filter(|w| !HEADER_CONNECTORS.contains(&w.as_str()) && !is_section_keyword(w))
        .count();
    foreign <= 1
}

fn is_section_keyword(word: &str) -> bool {
    SECTION_KEYWORDS
        .iter()
        .flat_map(|(_, words)| words.iter())
        .flat_map(|phrase| phrase.split(' '))
        .any(|kw| kw == word)
}

fn looks_like_header(lines: &[&str], idx: usize, label: &str, has_inline: bool) -> bool {
    let line = lines[idx].trim();
    let len = line.chars().count();
    let label_len = label.chars().count();
    let words = label.split_whitespace().count();

    if has_inline {
        return label_len < 40 && words <= 4;
    }

    if len < 50 && (line.ends_with(':') || is_upper_case(line) || is_title_case(line)) {
        return true;
    }

    if words <= 3 && len < 30 {
        let next = lines.get(idx + 1).map(|l| l.trim()).unwrap_or("");
        if next.is_empty() || is_bullet(next) {
            return true;
        }
    }

    if len < 30 {
        let lo = idx.saturating_sub(2);
        let hi = (idx + 2).min(lines.len().saturating_sub(1));
        let isolated = (lo..=hi)
            .filter(|&j| j != idx)
            .all(|j| lines[j].trim().chars().count() < len);
        if isolated {
            return true;
        }
    }

    false
}

/// Short lines set off by capitalisation or a colon, classified by keyword or,
/// failing that, by the cue words in the block that follows.
fn find_formatting_headers(lines: &[&str]) -> Vec<Header> {
    let candidates: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, raw)| {
            let line = raw.trim();
            !line.is_empty()
                && !is_bullet(line)
                && line.chars().count() < 30
                && line.split_whitespace().count() <= 4
                && (line.ends_with(':') || is_upper_case(line) || is_title_case(line))
        })
        .map(|(idx, _)| idx)
        .collect();

    candidates
        .iter()
        .enumerate()
        .filter_map(|(k, &idx)| {
            let line = lines[idx].trim().trim_end_matches(':');
            let end = candidates.get(k + 1).copied().unwrap_or(lines.len());
            let section = classify_header(line)
                .or_else(|| classify_block(&lines[idx + 1..end].join("\n")))?;
            Some(Header {
                line: idx,
                section,
                inline: None,
            })
        })
        .collect()
}

fn classify_block(block: &str) -> Option<SectionName> {
    CONTENT_PATTERNS
        .iter()
        .map(|(name, re)| (re.find_iter(block).count(), *name))
        .filter(|(hits, _)| *hits > 0)
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, name)| name)
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

fn split_by_headers(lines: &[&str], headers: Vec<Header>) -> BTreeMap<SectionName, String> {
    let mut found: BTreeMap<SectionName, String> = BTreeMap::new();

    for (k, header) in headers.iter().enumerate() {
        let end = headers.get(k + 1).map(|h| h.line).unwrap_or(lines.len());
        let mut parts: Vec<&str> = Vec::new();
        if let Some(inline) = &header.inline {
            parts.push(inline.as_str());
        }
        parts.extend(&lines[header.line + 1..end]);
        let body = parts.join("\n").trim().to_string();
        if body.is_empty() {
            continue;
        }
        found
            .entry(header.section)
            .and_modify(|existing| {
                existing.push_str("\n\n");
                existing.push_str(&body);
            })
            .or_insert(body);
    }

    found
}

fn group_keyword_sentences(text: &str) -> BTreeMap<SectionName, String> {
    let mut grouped: BTreeMap<SectionName, Vec<&str>> = BTreeMap::new();
    for sentence in SENTENCE_BREAK.split(text).map(str::trim) {
        if sentence.is_empty() {
            continue;
        }
        if let Some((name, _)) = CONTENT_PATTERNS.iter().find(|(_, re)| re.is_match(sentence)) {
            grouped.entry(*name).or_default().push(sentence);
        }
    }
    grouped
        .into_iter()
        .map(|(name, sentences)| (name, sentences.join("\n")))
        .collect()
}

fn inline_skills(text: &str) -> Option<String> {
    INLINE_SKILLS
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Line helpers
// ────────────────────────────────────────────────────────────────────────────

/// Splits "Skills: Rust, Go" into ("Skills", Some("Rust, Go")).
fn split_inline(line: &str) -> (&str, Option<String>) {
    match line.split_once(':') {
        Some((label, rest)) if !rest.trim().is_empty() => (label.trim(), Some(rest.trim().to_string())),
        Some((label, _)) => (label.trim(), None),
        None => (line, None),
    }
}

pub(crate) fn is_bullet(line: &str) -> bool {
    let line = line.trim_start();
    if line.starts_with(BULLET_MARKERS) {
        return true;
    }
    // "1." / "2)" numbered items
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')'))
}

/// Drops a leading bullet glyph or "1." / "2)" number from a list item.
pub(crate) fn strip_bullet(line: &str) -> String {
    let line = line.trim().trim_start_matches(BULLET_MARKERS);
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    let line = if digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')')) {
        &line[digits + 1..]
    } else {
        line
    };
    line.trim().to_string()
}

fn is_upper_case(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

/// Every cased word starts with an upper-case letter followed by lower-case ones.
fn is_title_case(line: &str) -> bool {
    let mut prev_cased = false;
    let mut any_cased = false;
    for c in line.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            any_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            any_cased = true;
        } else {
            prev_cased = false;
        }
    }
    any_cased
}
