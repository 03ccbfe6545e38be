//! PNG charts for the analysis outputs.
//!
//! Charts are unlabelled bar and heat maps; the Markdown report carries the
//! numbers and names in the same order as the bars.

use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};

use crate::intelligence::project_validator::ProjectValidation;
use crate::intelligence::skill_matcher::SkillAlignment;

const WIDTH: u32 = 800;
const MARGIN: u32 = 20;
const ROW_HEIGHT: u32 = 18;
const ROW_GAP: u32 = 6;
const GAUGE_HEIGHT: u32 = 40;
const PANEL_GAP: u32 = 30;
const MAX_ROWS: usize = 30;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TRACK: Rgb<u8> = Rgb([225, 225, 225]);
const STRONG: Rgb<u8> = Rgb([46, 160, 67]);
const MODERATE: Rgb<u8> = Rgb([230, 150, 30]);
const WEAK: Rgb<u8> = Rgb([214, 48, 49]);
const ACCENT: Rgb<u8> = Rgb([52, 101, 164]);
const GUIDE: Rgb<u8> = Rgb([40, 40, 40]);

/// Overall gauge, section scores against their maximum, and per-requirement
/// coverage with the missing-skill threshold drawn as a vertical line.
pub fn render_skill_alignment(alignment: &SkillAlignment, path: &Path) -> ImageResult<()> {
    let sections = &alignment.section_scores;
    let requirements: Vec<f64> = alignment
        .requirement_matches
        .iter()
        .take(MAX_ROWS)
        .map(|m| m.score)
        .collect();

    let height = MARGIN * 2
        + GAUGE_HEIGHT
        + PANEL_GAP
        + panel_height(sections.len())
        + PANEL_GAP
        + panel_height(requirements.len());
    let mut img = RgbImage::from_pixel(WIDTH, height, BACKGROUND);
    let inner = WIDTH - 2 * MARGIN;

    let mut y = MARGIN;
    draw_bar(&mut img, y, GAUGE_HEIGHT, alignment.overall_alignment / 100.0, band_color(alignment.overall_alignment));
    y += GAUGE_HEIGHT + PANEL_GAP;

    let max_points = sections.iter().map(|s| s.max_score).fold(0.0, f64::max);
    for s in sections {
        let track = if max_points > 0.0 { s.max_score / max_points } else { 0.0 };
        let filled = if max_points > 0.0 { s.score / max_points } else { 0.0 };
        fill_rect(&mut img, MARGIN, y, fraction_width(inner, track), ROW_HEIGHT, TRACK);
        fill_rect(&mut img, MARGIN, y, fraction_width(inner, filled), ROW_HEIGHT, ACCENT);
        y += ROW_HEIGHT + ROW_GAP;
    }
    y += PANEL_GAP;

    let panel_top = y;
    for score in &requirements {
        draw_bar(&mut img, y, ROW_HEIGHT, score / 100.0, band_color(*score));
        y += ROW_HEIGHT + ROW_GAP;
    }
    if !requirements.is_empty() {
        let x = MARGIN + fraction_width(inner, alignment.backend.missing_threshold());
        fill_rect(&mut img, x, panel_top, 2, y - panel_top, GUIDE);
    }

    img.save(path)
}

/// Project score bars (flagged projects in red, 40-point flag line) and a
/// heat map of skill alignment, technical depth and quantified results.
pub fn render_project_validation(validation: &ProjectValidation, path: &Path) -> ImageResult<()> {
    let projects: Vec<_> = validation.projects.iter().take(MAX_ROWS).collect();
    let height =
        MARGIN * 2 + panel_height(projects.len()) + PANEL_GAP + panel_height(projects.len());
    let mut img = RgbImage::from_pixel(WIDTH, height.max(MARGIN * 2 + 1), BACKGROUND);
    let inner = WIDTH - 2 * MARGIN;

    let mut y = MARGIN;
    for p in &projects {
        let color = if p.is_flagged() { WEAK } else { STRONG };
        draw_bar(&mut img, y, ROW_HEIGHT, p.score / 100.0, color);
        y += ROW_HEIGHT + ROW_GAP;
    }
    if !projects.is_empty() {
        let x = MARGIN + fraction_width(inner, 0.4);
        fill_rect(&mut img, x, MARGIN, 2, y - MARGIN, GUIDE);
    }
    y += PANEL_GAP;

    let cell_width = inner / 3;
    for p in &projects {
        let metrics = [
            p.metrics.skill_alignment,
            p.metrics.technical_depth,
            p.metrics.quantifiable_results,
        ];
        for (col, value) in metrics.iter().enumerate() {
            let x = MARGIN + col as u32 * cell_width;
            fill_rect(&mut img, x, y, cell_width - 2, ROW_HEIGHT, heat_color(*value));
        }
        y += ROW_HEIGHT + ROW_GAP;
    }

    img.save(path)
}

fn panel_height(rows: usize) -> u32 {
    rows as u32 * (ROW_HEIGHT + ROW_GAP)
}

fn fraction_width(inner: u32, fraction: f64) -> u32 {
    (inner as f64 * fraction.clamp(0.0, 1.0)).round() as u32
}

/// Grey track across the full width with the filled share on top.
fn draw_bar(img: &mut RgbImage, y: u32, height: u32, fraction: f64, color: Rgb<u8>) {
    let inner = img.width() - 2 * MARGIN;
    fill_rect(img, MARGIN, y, inner, height, TRACK);
    fill_rect(img, MARGIN, y, fraction_width(inner, fraction), height, color);
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn band_color(score: f64) -> Rgb<u8> {
    match score {
        s if s >= 70.0 => STRONG,
        s if s >= 50.0 => MODERATE,
        _ => WEAK,
    }
}

/// White at 0, full accent blue at 100.
fn heat_color(value: f64) -> Rgb<u8> {
    let t = (value / 100.0).clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    Rgb([mix(255, ACCENT.0[0]), mix(255, ACCENT.0[1]), mix(255, ACCENT.0[2])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::project_validator::validate_projects;
    use crate::intelligence::similarity::ScorerBackend;
    use crate::models::resume::SkillSet;

    fn alignment(overall: f64) -> SkillAlignment {
        SkillAlignment {
            backend: ScorerBackend::Tfidf,
            overall_alignment: overall,
            skill_alignment: overall,
            total_score: overall,
            section_scores: vec![],
            requirement_matches: vec![],
            skill_matches: vec![],
            missing_skills: vec![],
            candidate_skills: SkillSet::new(),
            jd_requirements: vec![],
            recommendation: String::new(),
        }
    }

    #[test]
    fn test_skill_alignment_chart_gauge_fill() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skill_alignment.png");
        render_skill_alignment(&alignment(75.0), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.width(), WIDTH);
        // left of the 75% mark is filled green, right of it is the grey track
        assert_eq!(*img.get_pixel(MARGIN + 10, MARGIN + 5), STRONG);
        assert_eq!(*img.get_pixel(WIDTH - MARGIN - 10, MARGIN + 5), TRACK);
    }

    #[test]
    fn test_project_chart_marks_flagged_red() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project_validation.png");
        let skills: SkillSet = ["Rust"].into_iter().collect();
        let validation = validate_projects("Bake Sale\n- Organized a bake sale", &skills);
        render_project_validation(&validation, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        // score 0: the whole bar is track, the flag guide line is drawn
        assert_eq!(*img.get_pixel(MARGIN + 1, MARGIN + 5), TRACK);
        let guide_x = MARGIN + fraction_width(WIDTH - 2 * MARGIN, 0.4);
        assert_eq!(*img.get_pixel(guide_x, MARGIN + 5), GUIDE);
    }

    #[test]
    fn test_empty_project_chart_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let validation = validate_projects("", &SkillSet::new());
        render_project_validation(&validation, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), Rgb([255, 255, 255]));
        assert_eq!(heat_color(100.0), ACCENT);
    }
}
