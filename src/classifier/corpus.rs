//! Labeled name corpus: header-less `name,gender_code` rows.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;

use super::error::ClassifierError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorpusRecord {
    pub name: String,
    pub gender: String,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub records: Vec<CorpusRecord>,
}

impl Corpus {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::Corpus(format!(
                "corpus not found: {}",
                path.display()
            )));
        }

        let file = File::open(path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: CorpusRecord =
                result.map_err(|e| ClassifierError::Corpus(e.to_string()))?;
            records.push(record);
        }

        tracing::info!(
            samples = records.len(),
            path = %path.display(),
            "Corpus loaded"
        );

        Ok(Self { records })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.gender.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
