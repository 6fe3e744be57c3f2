use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::TensorRef;

use super::error::ClassifierError;
use super::NameClassifier;
use crate::pipeline::sequence::EncodedSequence;

/// Binary name classifier exported to ONNX.
///
/// Input: one `[1, max_length]` float tensor of code points.
/// Output: `[1, 1]` sigmoid probability of the positive class.
///
/// ort's `Session::run` requires `&mut self`; the Mutex lets the classifier
/// sit behind `&dyn NameClassifier`.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    max_length: usize,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path, max_length: usize) -> Result<Self, ClassifierError> {
        if !model_path.exists() {
            return Err(ClassifierError::ModelNotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e: ort::Error| ClassifierError::ModelInit(format!("ONNX load failed: {e}")))?;

        tracing::info!(path = %model_path.display(), "ONNX classifier loaded");

        Ok(Self {
            session: Mutex::new(session),
            max_length,
        })
    }
}

impl NameClassifier for OnnxClassifier {
    fn classify(&self, sequence: &EncodedSequence) -> Result<f32, ClassifierError> {
        if sequence.len() != self.max_length {
            return Err(ClassifierError::Inference(format!(
                "sequence length {} does not match model input {}",
                sequence.len(),
                self.max_length
            )));
        }

        let values: Vec<f32> = sequence.as_slice().iter().map(|&v| v as f32).collect();
        let input = ndarray::Array2::from_shape_vec((1, self.max_length), values)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let tensor = TensorRef::from_array_view(&input)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ClassifierError::Inference(format!("ONNX inference failed: {e}")))?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Output extraction: {e}")))?;

        data.first()
            .copied()
            .ok_or_else(|| ClassifierError::Inference("empty model output".to_string()))
    }
}
