//! LinkedIn public profile scraping. Most requests land on the sign-in wall,
//! which surfaces as `ScrapeError::AuthWalled`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::profiles::fetcher::{check_page_response, ScrapeError};
use crate::profiles::html::{element_text, find_text_by_selectors, has_match, parse_count};
use crate::profiles::metrics::LinkedInMetrics;

static CONNECTIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d[\d,.]*\s*[km]?\+?)\s*(?:connections|followers)").expect("static regex")
});

const NAME: &[&str] = &["h1.text-heading-xlarge", "h1.top-card-layout__title", "h1"];
const HEADLINE: &[&str] = &[
    ".text-body-medium.break-words",
    "h2.top-card-layout__headline",
    ".top-card-layout__headline",
];
const ABOUT: &[&str] = &["section.summary", "#about", ".core-section-container.summary"];
const EXPERIENCE: &[&str] = &["section.experience", "#experience", "li.experience-item"];
const EDUCATION: &[&str] = &["section.education", "#education", "li.education__list-item"];

pub async fn fetch(client: &Client, url: &str) -> Result<LinkedInMetrics, ScrapeError> {
    let response = client.get(url).send().await?;
    check_page_response(&response, url)?;
    let body = response.text().await?;
    Ok(parse_profile(&body))
}

pub fn parse_profile(html: &str) -> LinkedInMetrics {
    let document = Html::parse_document(html);

    let has_name = find_text_by_selectors(&document, NAME).is_some();
    let headline = find_text_by_selectors(&document, HEADLINE);
    let parts = [
        has_name,
        headline.is_some(),
        has_match(&document, ABOUT),
        has_match(&document, EXPERIENCE),
        has_match(&document, EDUCATION),
    ];
    let profile_completeness = parts.iter().filter(|present| **present).count() as u32 * 20;

    let page_text = document.root_element().text().collect::<Vec<_>>().join(" ");
    let connection_count = CONNECTIONS
        .captures(&page_text)
        .and_then(|c| parse_count(&c[1]));

    LinkedInMetrics {
        profile_completeness,
        headline,
        connection_count,
        endorsements: endorsements(&document),
    }
}

fn endorsements(document: &Html) -> BTreeMap<String, u64> {
    let (Ok(entity), Ok(name), Ok(count)) = (
        Selector::parse(".pv-skill-category-entity"),
        Selector::parse(".pv-skill-category-entity__name-text"),
        Selector::parse(".pv-skill-category-entity__endorsement-count"),
    ) else {
        return BTreeMap::new();
    };

    document
        .select(&entity)
        .filter_map(|el| {
            let skill = el.select(&name).next().map(element_text)?;
            if skill.is_empty() {
                return None;
            }
            let endorsed = el
                .select(&count)
                .next()
                .and_then(|c| parse_count(&element_text(c)))
                .unwrap_or(0);
            Some((skill, endorsed))
        })
        .collect()
}
