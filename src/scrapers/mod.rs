//! Extractors that turn a fetched career page into candidates.
//!
//! Each [`Extractor`] variant has its own submodule:
//!
//! | Variant | Module | Output |
//! |---------|--------|--------|
//! | `Generic` | [`generic`] | at most one candidate, placeholder title, page URL as link |
//! | `Structured` | [`structured`] | one candidate per listing passing the keyword and location filters |
//!
//! Extraction is synchronous and never fails: selectors that do not parse
//! or match nothing simply produce no candidates.

pub mod generic;
pub mod structured;

use crate::models::{Candidate, Extractor, Site};

/// Run the site's extractor over `html`.
pub fn extract(site: &Site, html: &str) -> Vec<Candidate> {
    match &site.extractor {
        Extractor::Generic => generic::extract(site.name, site.url, html)
            .into_iter()
            .collect(),
        Extractor::Structured(selectors) => structured::extract(site.name, selectors, html),
    }
}
