//! Utility functions for hashing, log-friendly strings and the matches log.
//!
//! This module provides helper functions used throughout the application:
//! - Content-addressed fingerprints for the dedup store
//! - String truncation and whitespace cleanup for logging and extraction
//! - Appending emitted match lines to a plain-text log

use once_cell::sync::Lazy;
use regex::Regex;
use sha1::{Digest, Sha1};
use std::io::Write;
use tracing::{debug, warn};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Compute a SHA-1 fingerprint over an ordered list of strings.
///
/// Parts are fed to the hasher in order with no separator, so
/// `fingerprint(&["a", "bc"])` equals `fingerprint(&["ab", "c"])`. Callers
/// always pass the same fixed tuple (company, title, link), which keeps keys
/// compatible with existing `history.json` files.
///
/// # Returns
///
/// A 40-character lowercase hex digest.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(fingerprint(&["abc"]), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to the nearest
/// character boundary) and a byte count indicator is appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Node text pulled out of HTML keeps the indentation of the source page;
/// this turns `"\n   Cloud\n  Engineer "` into `"Cloud Engineer"`.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Append one emitted match line to the matches log.
///
/// The file is created on first use. Failures are logged and otherwise
/// ignored; the log is a convenience for humans, not part of dedup state.
pub fn append_match_log(path: &str, line: &str) {
    let res = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| writeln!(f, "{line}"));

    match res {
        Ok(()) => debug!(%path, "Appended match line"),
        Err(e) => warn!(%path, error = %e, "Failed to append to matches log"),
    }
}
