//! Name normalization: raw, honorific-laden text in, canonical name out.
//!
//! ```text
//! raw → prepare (NFC, spaces, lowercase) → strip titles → finalize (filter, spaces)
//! ```

pub mod canonical;
pub mod titles;
pub mod validate;

pub use canonical::canonicalize;
pub use titles::{strip_titles, TITLES};
pub use validate::is_valid_name;

/// Turns raw names into canonical names using the built-in title list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameNormalizer;

impl NameNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Full cleaning pipeline. Empty input gives an empty canonical name.
    pub fn clean(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let prepared = canonical::prepare(raw);
        canonical::finalize(&strip_titles(&prepared))
    }

    pub fn is_valid(&self, canonical_name: &str) -> bool {
        is_valid_name(canonical_name)
    }
}
