//! Whole-page keyword scan.
//!
//! Used for every site without a known listing layout. The visible text of
//! `<body>` is lowercased and checked against the keyword set; a hit yields
//! one candidate pointing at the page itself.

use crate::matcher::text_matches_keywords;
use crate::models::Candidate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

/// Title used for generic matches, which carry no per-job detail.
pub const PLACEHOLDER_TITLE: &str = "Possible cloud/DevOps opening";

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("static selector"));

/// Lowercased text content of the page body.
pub fn body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&BODY)
        .flat_map(|body| body.text())
        .join(" ")
        .to_lowercase()
}

pub fn extract(company: &str, url: &str, html: &str) -> Option<Candidate> {
    let text = body_text(html);
    if !text_matches_keywords(&text) {
        debug!(%company, bytes = text.len(), "No keyword in page body");
        return None;
    }

    Some(Candidate {
        company: company.to_string(),
        title: PLACEHOLDER_TITLE.to_string(),
        location: String::new(),
        link: url.to_string(),
    })
}
