//! Classifier boundary errors.
//!
//! Load-time variants are fatal for a batch run. `Inference` and
//! `InvalidOutput` are per-row and end up as a `PredictionFailed` outcome.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model artifact not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    #[error("Preprocessor error: {0}")]
    Preprocessor(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Classifier returned an invalid probability: {0}")]
    InvalidOutput(f32),

    #[error("No classifier backend compiled in (build with the `onnx` feature)")]
    BackendUnavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
