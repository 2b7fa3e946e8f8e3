//! Listing traversal for sites with stable markup.
//!
//! Each node matched by the listing selector is read for a title, a
//! location and a link; the link is resolved against the site's base URL.
//! A listing becomes a candidate when its title hits the keyword set and
//! its location contains the site's location filter.

use crate::matcher::{location_contains, text_matches_keywords};
use crate::models::{Candidate, Listing, ListingSelectors};
use crate::utils::normalize_whitespace;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!(selector = css, error = %e, "Invalid selector; treating as no match");
            None
        }
    }
}

/// Text of every descendant matching `sel`, joined and whitespace-normalized.
fn child_text(node: &ElementRef<'_>, sel: &Selector) -> String {
    let text = node.select(sel).flat_map(|el| el.text()).join(" ");
    normalize_whitespace(&text)
}

/// Read every listing node from `html`.
///
/// Listings without a link are dropped. Missing title or location nodes
/// give empty strings; several matching nodes have their text joined.
pub fn listings(selectors: &ListingSelectors, html: &str) -> Vec<Listing> {
    let (Some(listing), Some(title), Some(location), Some(link)) = (
        parse_selector(selectors.listing),
        parse_selector(selectors.title),
        parse_selector(selectors.location),
        parse_selector(selectors.link),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&listing)
        .filter_map(|node| {
            let href = node
                .select(&link)
                .filter_map(|a| a.value().attr("href"))
                .next();
            let Some(href) = href else {
                debug!("Listing without link; skipping");
                return None;
            };
            Some(Listing {
                title: child_text(&node, &title),
                location: child_text(&node, &location),
                link: href.trim().to_string(),
            })
        })
        .collect()
}

pub fn extract(company: &str, selectors: &ListingSelectors, html: &str) -> Vec<Candidate> {
    let base = match Url::parse(selectors.base_url) {
        Ok(base) => base,
        Err(e) => {
            warn!(%company, base = selectors.base_url, error = %e, "Invalid base URL");
            return Vec::new();
        }
    };

    let all = listings(selectors, html);
    let total = all.len();
    let found = all
        .into_iter()
        .filter(|l| {
            text_matches_keywords(&l.title) && location_contains(selectors.location_filter, &l.location)
        })
        .filter_map(|l| match base.join(&l.link) {
            Ok(abs) => Some(Candidate {
                company: company.to_string(),
                title: l.title,
                location: l.location,
                link: abs.to_string(),
            }),
            Err(e) => {
                warn!(%company, link = %l.link, error = %e, "Unresolvable listing link");
                None
            }
        })
        .collect::<Vec<_>>();

    debug!(%company, listings = total, matches = found.len(), "Scanned listings");
    found
}
