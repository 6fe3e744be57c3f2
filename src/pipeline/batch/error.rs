//! Batch pipeline error types.
//!
//! Only input, collaborator-load and output failures surface here. A row the
//! classifier cannot handle is recorded as an outcome, never raised.

use std::path::PathBuf;

use thiserror::Error;

use crate::classifier::ClassifierError;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("Could not decode {path} with any of: {tried}")]
    Undecodable { path: PathBuf, tried: String },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input table has no columns")]
    NoColumns,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Input error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Configured sequence length {configured} does not match the loaded encoder ({encoder})")]
    LengthMismatch { configured: usize, encoder: usize },
}
