use std::sync::LazyLock;

use regex::Regex;

/// Decimal digits only (Unicode `Nd`). Roman numerals and other numeric
/// letters do not count.
static DIGITS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// A canonical name is usable when, once trimmed, it is neither empty nor
/// made only of decimal digits.
pub fn is_valid_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && !DIGITS_ONLY.is_match(trimmed)
}
