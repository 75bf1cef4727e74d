//! Normalization and filtering of extracted entity candidates.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of entries kept per list.
pub const MAX_ITEMS: usize = 20;

/// Terms never reported as people or places.
pub const ENTITY_BLOCKLIST: &[&str] = &["memory", "story", "talesync", "life"];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static PUNCTUATION_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\W_]+$").expect("valid regex"));

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(item: &str) -> String {
    WHITESPACE_RUN.replace_all(item.trim(), " ").into_owned()
}

/// Clean a list of free-text candidates.
///
/// Each item is whitespace-normalized, then dropped when empty, blocklisted
/// (compared lowercase), shorter than two characters, or made only of
/// punctuation. Survivors are deduplicated with the first occurrence winning
/// and the result is capped at [`MAX_ITEMS`].
pub fn clean_items<S: AsRef<str>>(items: &[S], blocklist: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for item in items {
        let normalized = normalize_whitespace(item.as_ref());
        if normalized.is_empty() {
            continue;
        }
        let lowered = normalized.to_lowercase();
        if blocklist.contains(&lowered.as_str()) {
            continue;
        }
        if normalized.chars().count() < 2 {
            continue;
        }
        if PUNCTUATION_ONLY.is_match(&normalized) {
            continue;
        }
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }

    out.truncate(MAX_ITEMS);
    out
}
