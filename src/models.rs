//! Data models for career sites and the matches found on them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Site`]: A career page to watch, with the [`Extractor`] that reads it
//! - [`ListingSelectors`]: CSS selectors for sites with a stable listing layout
//! - [`Listing`]: One job row pulled out of a structured page
//! - [`Candidate`]: A possible opening that may be turned into an alert

use crate::utils::fingerprint;

/// A career page to scrape.
///
/// Sites are built once from the static registry in [`crate::sites`] and
/// never change during a run.
#[derive(Debug, Clone)]
pub struct Site {
    /// Company name shown in the alert.
    pub name: &'static str,
    /// Page to fetch.
    pub url: &'static str,
    /// How matches are pulled out of the fetched page.
    pub extractor: Extractor,
}

impl Site {
    pub const fn generic(name: &'static str, url: &'static str) -> Self {
        Self {
            name,
            url,
            extractor: Extractor::Generic,
        }
    }

    pub const fn structured(
        name: &'static str,
        url: &'static str,
        selectors: ListingSelectors,
    ) -> Self {
        Self {
            name,
            url,
            extractor: Extractor::Structured(selectors),
        }
    }
}

/// The way a fetched page is turned into candidates.
#[derive(Debug, Clone)]
pub enum Extractor {
    /// Whole-page keyword scan producing at most one candidate.
    Generic,
    /// Per-listing traversal with a location filter.
    Structured(ListingSelectors),
}

impl Extractor {
    pub fn kind(&self) -> &'static str {
        match self {
            Extractor::Generic => "generic_body",
            Extractor::Structured(_) => "structured_listing",
        }
    }
}

/// Selectors describing a listing page.
///
/// `listing` picks each job row; the other selectors are evaluated relative
/// to that row. `link` must match an element carrying an `href` attribute.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub listing: &'static str,
    pub title: &'static str,
    pub location: &'static str,
    pub link: &'static str,
    /// Base URL that relative links are resolved against.
    pub base_url: &'static str,
    /// Substring a listing's location must contain (case-insensitive).
    pub location_filter: &'static str,
}

/// A single job row read from a structured page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub location: String,
    /// Link as found in the page, usually relative.
    pub link: String,
}

/// A possible opening proposed by a site worker.
///
/// `title` and `location` may be empty. `link` is always absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub company: String,
    pub title: String,
    pub location: String,
    pub link: String,
}

impl Candidate {
    /// Dedup key over company, title and link.
    ///
    /// Location is left out so a listing whose location text changes
    /// cosmetically does not alert twice.
    pub fn fingerprint(&self) -> String {
        fingerprint(&[&self.company, &self.title, &self.link])
    }

    /// Chat message for this candidate: `✅ <company>: <title> <location>→ <link>`.
    pub fn message(&self) -> String {
        format!(
            "✅ {}: {} {}→ {}",
            self.company, self.title, self.location, self.link
        )
    }
}
