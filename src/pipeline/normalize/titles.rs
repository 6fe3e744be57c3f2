use std::sync::LazyLock;

use regex::Regex;

/// Honorifics and professional titles that carry no identity information.
/// Vietnamese kinship terms first, then professional titles and their
/// abbreviations, then English forms.
pub const TITLES: &[&str] = &[
    "anh", "chị", "em", "bác", "cô", "chú", "dì", "thím",
    "ông", "bà", "cụ", "thầy", "giáo", "sư",
    "tiến sĩ", "tiến sỹ", "ts", "th.s", "ths", "bs", "bác sĩ",
    "kỹ sư", "ks", "luật sư", "ls", "giám đốc", "gđ",
    "phó giám đốc", "pgđ", "trưởng phòng", "tp", "phó trưởng phòng", "ptp",
    "mr", "mrs", "miss", "ms", "dr", "prof", "professor",
];

/// Single alternation over every title, longest first, so "bác sĩ" wins over
/// "bác" and "phó giám đốc" over "giám đốc". The regex engine is
/// leftmost-first, which makes alternation order the precedence order.
static TITLE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| compile_title_pattern(TITLES));

/// Build the case-insensitive, word-bounded title pattern.
/// Each match also absorbs the whitespace that follows it.
///
/// Blank tokens are dropped: an empty alternative would match at every word
/// boundary and eat the spaces between words. `None` when nothing is left.
pub(crate) fn compile_title_pattern(titles: &[&str]) -> Option<Regex> {
    let mut sorted: Vec<&str> = titles
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    sorted.dedup();

    let alternation = sorted
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    Some(Regex::new(&format!(r"(?i)\b(?:{alternation})\b\s*")).expect("title alternation is a valid regex"))
}

/// Remove every title occurrence from already lowercased, trimmed text.
pub fn strip_titles(text: &str) -> String {
    strip_with(TITLE_PATTERN.as_ref(), text)
}

pub(crate) fn strip_with(pattern: Option<&Regex>, text: &str) -> String {
    match pattern {
        Some(pattern) if !text.is_empty() => pattern.replace_all(text, "").into_owned(),
        _ => text.to_string(),
    }
}
