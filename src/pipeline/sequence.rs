//! Code-point sequence encoding for the classifier.
//!
//! Every name becomes exactly `max_length` integers: one Unicode scalar value
//! per character, pre-padded with 0 and truncated from the left. Corpus
//! encoding and single-name encoding share this code path, so the classifier
//! always sees the name's tail at the same positions it was fitted on.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_LENGTH;

/// Padding value placed before short names.
pub const PAD: u32 = 0;

/// Fixed-length code-point sequence. Length always equals the encoder's `max_length`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedSequence(Vec<u32>);

impl EncodedSequence {
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of non-padding positions.
    pub fn content_len(&self) -> usize {
        self.0.iter().filter(|&&v| v != PAD).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEncoder {
    max_length: usize,
}

impl Default for SequenceEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl SequenceEncoder {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Raw code points of the lowercased, trimmed name.
    pub fn code_points(name: &str) -> Vec<u32> {
        name.to_lowercase().trim().chars().map(u32::from).collect()
    }

    pub fn encode(&self, name: &str) -> EncodedSequence {
        self.fit(Self::code_points(name))
    }

    /// Corpus form: one row per name, every row `max_length` wide.
    pub fn encode_batch<I, S>(&self, names: I) -> Vec<EncodedSequence>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|n| self.encode(n.as_ref())).collect()
    }

    /// Keep the trailing `max_length` values, pad the front with [`PAD`].
    fn fit(&self, points: Vec<u32>) -> EncodedSequence {
        let len = points.len();
        if len >= self.max_length {
            return EncodedSequence(points[len - self.max_length..].to_vec());
        }

        let mut padded = vec![PAD; self.max_length - len];
        padded.extend(points);
        EncodedSequence(padded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_max_length() {
        let encoder = SequenceEncoder::default();
        let long = "x".repeat(100);
        for name in ["", "a", "hiếu", "nguyễn văn nam", long.as_str()] {
            assert_eq!(encoder.encode(name).len(), DEFAULT_MAX_LENGTH, "name: {name:?}");
        }
    }

    #[test]
    fn pads_on_the_left() {
        let encoder = SequenceEncoder::new(6);
        let seq = encoder.encode("hoa");
        assert_eq!(seq.as_slice(), &[0, 0, 0, 'h' as u32, 'o' as u32, 'a' as u32]);
        assert_eq!(seq.content_len(), 3);
    }

    #[test]
    fn truncates_keeping_the_tail() {
        let encoder = SequenceEncoder::new(4);
        let seq = encoder.encode("abcdefg");
        let expected: Vec<u32> = "defg".chars().map(u32::from).collect();
        assert_eq!(seq.as_slice(), expected.as_slice());
    }

    #[test]
    fn exact_length_is_untouched() {
        let encoder = SequenceEncoder::new(3);
        let expected: Vec<u32> = "abc".chars().map(u32::from).collect();
        assert_eq!(encoder.encode("abc").as_slice(), expected.as_slice());
    }

    #[test]
    fn uses_code_points_not_bytes() {
        let encoder = SequenceEncoder::new(4);
        let seq = encoder.encode("ếu");
        assert_eq!(seq.as_slice(), &[0, 0, 0x1EBF, 'u' as u32]);
    }

    #[test]
    fn lowercases_and_trims() {
        let encoder = SequenceEncoder::new(5);
        assert_eq!(encoder.encode("  HOA "), encoder.encode("hoa"));
    }

    #[test]
    fn empty_name_is_all_padding() {
        let encoder = SequenceEncoder::new(5);
        assert_eq!(encoder.encode("").as_slice(), &[PAD; 5]);
    }

    #[test]
    fn batch_matches_single_encoding() {
        let encoder = SequenceEncoder::default();
        let names = ["hiếu", "trần thị hoa", "a"];
        let batch = encoder.encode_batch(names);
        assert_eq!(batch.len(), 3);
        for (row, name) in batch.iter().zip(names) {
            assert_eq!(row, &encoder.encode(name));
        }
    }
}
