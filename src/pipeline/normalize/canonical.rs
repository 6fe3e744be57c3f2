//! Unicode canonicalization of name text.
//!
//! Two passes around title stripping:
//! - `prepare`: NFC, whitespace collapse, lowercase
//! - `finalize`: drop characters outside the name alphabet, collapse again
//!
//! NFC must run before the character filter. A decomposed "ế" is "e" plus two
//! combining marks, and filtering that sequence piecemeal corrupts it.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Word characters, plain space, Latin-1 Supplement through Latin Extended-B,
/// and Latin Extended Additional (the precomposed Vietnamese vowels).
static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w \u{00C0}-\u{024F}\u{1E00}-\u{1EFF}]").expect("valid regex")
});

/// Collapse every whitespace run to one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First pass: NFC, single-spaced, lowercase.
pub fn prepare(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let composed: String = text.nfc().collect();
    collapse_whitespace(&composed).to_lowercase()
}

/// Second pass, run after titles are gone.
pub fn finalize(text: &str) -> String {
    let filtered = DISALLOWED_CHARS.replace_all(text, "");
    // Removing a character can leave a base letter next to a combining mark
    // that now composes with it.
    collapse_whitespace(&filtered).nfc().collect()
}

/// Both passes with no title stripping in between. A fixed point:
/// `canonicalize(&canonicalize(x)) == canonicalize(x)`.
pub fn canonicalize(text: &str) -> String {
    finalize(&prepare(text))
}
