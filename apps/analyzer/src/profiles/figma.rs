//! Figma community file / profile scraping.

use reqwest::Client;
use scraper::{Html, Selector};

use crate::profiles::fetcher::{check_page_response, ScrapeError};
use crate::profiles::html::{clean_text, find_attr, find_text_by_selectors, parse_count};
use crate::profiles::metrics::FigmaMetrics;

const TITLE: &[&str] = &["h1"];

pub async fn fetch(client: &Client, url: &str) -> Result<FigmaMetrics, ScrapeError> {
    let response = client.get(url).send().await?;
    check_page_response(&response, url)?;
    let body = response.text().await?;
    Ok(parse_file(&body))
}

pub fn parse_file(html: &str) -> FigmaMetrics {
    let document = Html::parse_document(html);
    let project_name = find_text_by_selectors(&document, TITLE)
        .or_else(|| find_attr(&document, r#"meta[property="og:title"]"#, "content"));

    FigmaMetrics {
        project_name,
        likes: labelled_count(&document, "like"),
        views: labelled_count(&document, "view"),
    }
}

/// Count from the first element whose `aria-label` mentions `keyword`,
/// e.g. `aria-label="1.2k likes"`.
fn labelled_count(document: &Html, keyword: &str) -> u64 {
    let Ok(selector) = Selector::parse("[aria-label]") else {
        return 0;
    };
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("aria-label"))
        .map(clean_text)
        .filter(|label| label.to_lowercase().contains(keyword))
        .find_map(|label| parse_count(&label))
        .unwrap_or(0)
}
