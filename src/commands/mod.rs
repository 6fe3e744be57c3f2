//! CLI command handlers.
//!
//! Each handler takes its parsed arguments, does the work, and prints
//! user-facing output to stdout. Diagnostics go through `tracing` (stderr).

pub mod batch;
pub mod predict;
pub mod prepare;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::classifier::{load_classifier, ClassifierError};
use crate::pipeline::batch::{BatchError, BatchRunner, OutputError};
use crate::pipeline::normalize::NameNormalizer;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Input file not found: {0}")]
    InputMissing(PathBuf),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Failed to load classifier: {0}")]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Terminal I/O error: {0}")]
    Prompt(#[from] std::io::Error),
}

impl CommandError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Load the classifier and preprocessor and wire them into a runner.
///
/// The encoder's length always comes from the preprocessor artifact.
pub fn load_runner(model_path: &Path, preprocessor_path: &Path) -> Result<BatchRunner, CommandError> {
    tracing::info!(
        model = %model_path.display(),
        preprocessor = %preprocessor_path.display(),
        "Loading classifier"
    );
    let (classifier, preprocessor) = load_classifier(model_path, preprocessor_path)?;
    Ok(BatchRunner::new(
        NameNormalizer::new(),
        preprocessor.encoder(),
        classifier,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifacts_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_runner(&dir.path().join("m.onnx"), &dir.path().join("p.json"));
        assert!(matches!(
            result,
            Err(CommandError::Classifier(ClassifierError::ModelNotFound(_)))
        ));
    }

    #[test]
    fn every_error_exits_non_zero() {
        let err = CommandError::InputMissing(PathBuf::from("x.csv"));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Input file not found: x.csv");
    }
}
