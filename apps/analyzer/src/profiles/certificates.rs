//! Certificate verification links (Microsoft Learn, AWS, Coursera) found in
//! a résumé, and whether each carries an ID the issuer can look up.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::intelligence::sections::detect_sections;
use crate::models::resume::SectionName;

static CERTIFICATE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?((?:learn\.microsoft\.com|aws\.amazon\.com|coursera\.org)/[\w\-./?=&%#]*)",
    )
    .expect("static regex")
});
static MICROSOFT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)MS-\d{3,}").expect("static regex"));
static AWS_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)AWS-\d{2,}-\d{4,}").expect("static regex"));
static COURSERA_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z0-9]{10,}").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateProvider {
    Microsoft,
    Aws,
    Coursera,
}

impl CertificateProvider {
    /// Issuer for a lower-cased `host/path`, when the path is a verification page.
    fn from_link(link: &str) -> Option<Self> {
        if link.starts_with("learn.microsoft.com") && link.contains("certification") {
            Some(Self::Microsoft)
        } else if link.starts_with("aws.amazon.com/verification") {
            Some(Self::Aws)
        } else if link.starts_with("coursera.org/verify")
            || link.starts_with("coursera.org/account/accomplishments")
        {
            Some(Self::Coursera)
        } else {
            None
        }
    }

    fn id_pattern(self) -> &'static Regex {
        match self {
            Self::Microsoft => &MICROSOFT_ID,
            Self::Aws => &AWS_ID,
            Self::Coursera => &COURSERA_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CertificateLink {
    pub provider: CertificateProvider,
    pub url: String,
    /// `None` when the link has no ID in the issuer's format.
    pub certificate_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateReport {
    /// The résumé has a Certifications section.
    pub listed: bool,
    pub links: Vec<CertificateLink>,
}

pub fn check_certificates(text: &str) -> CertificateReport {
    CertificateReport {
        listed: detect_sections(text)
            .section(SectionName::Certifications)
            .is_some(),
        links: extract_certificate_links(text),
    }
}

/// Verification links, normalised to `https://`, de-duplicated and sorted.
pub fn extract_certificate_links(text: &str) -> Vec<CertificateLink> {
    let links: BTreeSet<CertificateLink> = CERTIFICATE_URL
        .captures_iter(text)
        .filter_map(|c| {
            let raw = c[1].trim_end_matches(['.', ',', '/']);
            let (host, path) = raw.split_once('/').unwrap_or((raw, ""));
            let link = format!("{}/{path}", host.to_ascii_lowercase());
            let provider = CertificateProvider::from_link(&link.to_ascii_lowercase())?;
            let certificate_id = provider
                .id_pattern()
                .find(path)
                .map(|m| m.as_str().to_string());
            Some(CertificateLink {
                provider,
                url: format!("https://{link}"),
                certificate_id,
            })
        })
        .collect();
    links.into_iter().collect()
}
