//! Keyword and location predicates applied to scraped text.
//!
//! Matching is plain substring search on lowercased input, not word
//! matching, so `devops-engineer` and `cloudops` both hit.

/// Terms that mark a page or title as a cloud/DevOps opening.
pub const KEYWORDS: &[&str] = &[
    "devops",
    "cloud",
    "platform",
    "sre",
    "terraform",
    "azure",
    "kubernetes",
];

/// `true` if the lowercased text contains any of [`KEYWORDS`].
pub fn text_matches_keywords(text: &str) -> bool {
    let text = text.to_lowercase();
    KEYWORDS.iter().any(|k| text.contains(k))
}

/// `true` if `loc` contains `target`, ignoring case.
pub fn location_contains(target: &str, loc: &str) -> bool {
    loc.to_lowercase().contains(&target.to_lowercase())
}
