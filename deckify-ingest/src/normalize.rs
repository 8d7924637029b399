//! Title normalization for metadata search keys
//!
//! Catalog titles carry annotations ("(Remastered 2009)", "[Live]",
//! "- Radio Edit") that make metadata searches miss. The normalized form is
//! only ever used as a search key; records keep the title as received.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cleanup patterns, applied in order.
static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Parenthesised annotations: "(Remastered 2009)"
        Regex::new(r"\s*\(.*?\)\s*").expect("valid regex"),
        // Square brackets: "[Live]"
        Regex::new(r"\s*\[.*?\]\s*").expect("valid regex"),
        // Curly braces: "{Demo}"
        Regex::new(r"\s*\{.*?\}\s*").expect("valid regex"),
        // Hyphen and everything after it: "- Radio Edit"
        Regex::new(r"\s*-.*").expect("valid regex"),
    ]
});

/// Strip bracketed annotations and dash suffixes from a track title.
///
/// Never fails; a title without annotations comes back trimmed.
pub fn normalize_title(title: &str) -> String {
    let mut cleaned = title.to_string();
    for pattern in TITLE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}
