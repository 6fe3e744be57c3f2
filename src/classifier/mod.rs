//! Classifier boundary.
//!
//! The batch pipeline only sees [`NameClassifier`]: one fixed-length sequence
//! in, the positive-class probability out. Loading, weights and runtime state
//! belong to the implementation.

pub mod corpus;
pub mod error;
pub mod preprocessor;

#[cfg(feature = "onnx")]
mod onnx;

use std::path::Path;

pub use corpus::{Corpus, CorpusRecord};
pub use error::ClassifierError;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use preprocessor::{LabelEncoder, Preprocessor};

use crate::pipeline::sequence::EncodedSequence;

/// Stateless from the caller's point of view: the same sequence always yields
/// the same probability.
pub trait NameClassifier: Send + Sync {
    /// Probability in [0, 1] that the name belongs to the positive ("male") class.
    fn classify(&self, sequence: &EncodedSequence) -> Result<f32, ClassifierError>;
}

/// Load the trained classifier and its preprocessor.
///
/// Fails when either artifact is missing or corrupt, or when no inference
/// backend was compiled in.
pub fn load_classifier(
    model_path: &Path,
    preprocessor_path: &Path,
) -> Result<(Box<dyn NameClassifier>, Preprocessor), ClassifierError> {
    let preprocessor = Preprocessor::load(preprocessor_path)?;

    if !model_path.exists() {
        return Err(ClassifierError::ModelNotFound(model_path.to_path_buf()));
    }

    let classifier = load_backend(model_path, preprocessor.max_length)?;
    Ok((classifier, preprocessor))
}

#[cfg(feature = "onnx")]
fn load_backend(
    model_path: &Path,
    max_length: usize,
) -> Result<Box<dyn NameClassifier>, ClassifierError> {
    Ok(Box::new(OnnxClassifier::load(model_path, max_length)?))
}

#[cfg(not(feature = "onnx"))]
fn load_backend(
    model_path: &Path,
    _max_length: usize,
) -> Result<Box<dyn NameClassifier>, ClassifierError> {
    tracing::error!(
        path = %model_path.display(),
        "Cannot load model: built without an inference backend"
    );
    Err(ClassifierError::BackendUnavailable)
}
