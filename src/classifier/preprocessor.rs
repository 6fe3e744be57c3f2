//! Preprocessor artifact: encoder length plus the fitted label classes.
//!
//! The classifier outputs the probability of class index 1. With the usual
//! `f`/`m` codes that is the "male" class, which is all the batch pipeline
//! assumes about labels.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::corpus::Corpus;
use super::error::ClassifierError;
use crate::pipeline::batch::output::write_atomically;
use crate::pipeline::sequence::SequenceEncoder;

/// Sorted unique label codes. Index in `classes` is the encoded label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: BTreeSet<&str> = labels.into_iter().collect();
        Self {
            classes: unique.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn from_classes(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub max_length: usize,
    pub classes: Vec<String>,
}

impl Preprocessor {
    /// Fit label classes from a corpus. Binary classification needs exactly two codes.
    pub fn fit(corpus: &Corpus, max_length: usize) -> Result<Self, ClassifierError> {
        let encoder = LabelEncoder::fit(corpus.labels());
        let preprocessor = Self {
            max_length,
            classes: encoder.classes().to_vec(),
        };
        preprocessor.check()?;
        Ok(preprocessor)
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ModelNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let preprocessor: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ClassifierError::Preprocessor(format!("{}: {e}", path.display())))?;
        preprocessor.check()?;

        tracing::info!(
            path = %path.display(),
            max_length = preprocessor.max_length,
            "Preprocessor loaded"
        );
        Ok(preprocessor)
    }

    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| ClassifierError::Preprocessor(e.to_string()))?;
        write_atomically(path, &json).map_err(|e| ClassifierError::Preprocessor(e.to_string()))?;
        tracing::info!(path = %path.display(), "Preprocessor saved");
        Ok(())
    }

    pub fn encoder(&self) -> SequenceEncoder {
        SequenceEncoder::new(self.max_length)
    }

    pub fn labels(&self) -> LabelEncoder {
        LabelEncoder::from_classes(self.classes.clone())
    }

    fn check(&self) -> Result<(), ClassifierError> {
        if self.max_length == 0 {
            return Err(ClassifierError::Preprocessor(
                "max_length must be positive".into(),
            ));
        }
        if self.classes.len() != 2 {
            return Err(ClassifierError::Preprocessor(format!(
                "expected 2 label classes, found {}: {:?}",
                self.classes.len(),
                self.classes
            )));
        }
        Ok(())
    }
}
