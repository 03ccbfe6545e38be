//! Small helpers shared by the HTML profile scrapers.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:[.,]\d+)*)(?:\s*([kKmM])\b)?").expect("static regex"));

/// Text of the first element matching any selector, in selector order.
pub fn find_text_by_selectors(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|s| {
        let selector = Selector::parse(s).ok()?;
        document
            .select(&selector)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

/// Value of `attr` on the first element matching `selector`.
pub fn find_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|el| el.value().attr(attr))
        .map(clean_text)
        .filter(|v| !v.is_empty())
}

pub fn has_match(document: &Html, selectors: &[&str]) -> bool {
    selectors.iter().any(|s| {
        Selector::parse(s)
            .map(|sel| document.select(&sel).next().is_some())
            .unwrap_or(false)
    })
}

pub fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Collapses all whitespace runs to single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First count in `text`: "1,234" is 1234, "1.2k" is 1200, "3M" is 3000000.
pub fn parse_count(text: &str) -> Option<u64> {
    let caps = COUNT.captures(text)?;
    let digits = &caps[1];
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(s) if s == "k" => 1_000.0,
        Some(s) if s == "m" => 1_000_000.0,
        _ => 1.0,
    };
    let value: f64 = if multiplier > 1.0 {
        digits.replace(',', ".").parse().ok()?
    } else {
        digits.replace([',', '.'], "").parse().ok()?
    };
    Some((value * multiplier).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><meta property="og:title" content="  Design System  "></head>
        <body><h1>  Jane
            Doe </h1><p class="empty"></p><p class="bio">Builds things</p></body></html>"#;

    #[test]
    fn test_find_text_by_selectors_in_order() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(
            find_text_by_selectors(&doc, &[".missing", "h1"]).as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(
            find_text_by_selectors(&doc, &["p"]).as_deref(),
            Some("Builds things")
        );
        assert!(find_text_by_selectors(&doc, &[".missing"]).is_none());
    }

    #[test]
    fn test_find_attr_and_has_match() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(
            find_attr(&doc, r#"meta[property="og:title"]"#, "content").as_deref(),
            Some("Design System")
        );
        assert!(has_match(&doc, &[".nope", ".bio"]));
        assert!(!has_match(&doc, &[".nope"]));
    }

    #[test]
    fn test_parse_count_formats() {
        assert_eq!(parse_count("1,234 likes"), Some(1234));
        assert_eq!(parse_count("1.2k views"), Some(1200));
        assert_eq!(parse_count("3M"), Some(3_000_000));
        assert_eq!(parse_count("500+ connections"), Some(500));
        assert_eq!(parse_count("12 members"), Some(12));
        assert_eq!(parse_count("no numbers"), None);
    }
}
