//! Skin-condition image classifier via ONNX Runtime.
//!
//! Runs a six-class CNN over a 224×224 RGB crop of the photo and maps the
//! argmax logit to a condition label.

use dermascan_core::{AdapterError, Classification, Condition, ConditionClassifier};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;

// --- Named constants (no magic numbers) ---
const CLASSIFIER_INPUT_SIZE: usize = 224;
const CLASSIFIER_PIXEL_SCALE: f32 = 255.0;
const CLASSIFIER_NUM_CLASSES: usize = 6;

/// Class index → condition label, fixed by the training export.
const CLASS_LABELS: [Condition; CLASSIFIER_NUM_CLASSES] = Condition::ALL;

/// ONNX-backed skin-condition classifier.
#[derive(Debug)]
pub struct SkinClassifier {
    session: Session,
}

impl SkinClassifier {
    /// Load the classifier ONNX model from the given path.
    pub fn load(model_path: &str) -> Result<Self, AdapterError> {
        if !Path::new(model_path).exists() {
            return Err(AdapterError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()
            .and_then(|b| Ok(b.with_intra_threads(2)?))
            .and_then(|mut b| b.commit_from_file(model_path))
            .map_err(|e| AdapterError::BackendUnavailable(e.to_string()))?;

        tracing::info!(
            path = model_path,
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?session.outputs().iter().map(|o| o.name()).collect::<Vec<_>>(),
            "loaded skin-condition model"
        );

        Ok(Self { session })
    }

    /// Preprocess an RGB crop into a 1×3×224×224 NCHW float tensor,
    /// scaled to [0, 1].
    fn preprocess(rgb: &RgbImage) -> Array4<f32> {
        let size = CLASSIFIER_INPUT_SIZE;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));

        for y in 0..size {
            for x in 0..size {
                let pixel = rgb.get_pixel(x as u32, y as u32);
                for channel in 0..3 {
                    tensor[[0, channel, y, x]] =
                        pixel.0[channel] as f32 / CLASSIFIER_PIXEL_SCALE;
                }
            }
        }

        tensor
    }
}

impl ConditionClassifier for SkinClassifier {
    /// Classify a skin photo into a condition label with softmax confidence.
    fn classify(&mut self, image: &DynamicImage) -> Result<Classification, AdapterError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AdapterError::Unprocessable("empty image".into()));
        }

        let rgb = image
            .resize_exact(
                CLASSIFIER_INPUT_SIZE as u32,
                CLASSIFIER_INPUT_SIZE as u32,
                FilterType::Triangle,
            )
            .to_rgb8();
        let input = Self::preprocess(&rgb);

        let input_tensor = TensorRef::from_array_view(input.view())
            .map_err(|e| AdapterError::InferenceFailed(e.to_string()))?;
        let outputs = self
            .session
            .run(ort::inputs![input_tensor])
            .map_err(|e| AdapterError::InferenceFailed(e.to_string()))?;

        let (_, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| AdapterError::InferenceFailed(format!("class scores: {e}")))?;

        if logits.len() != CLASSIFIER_NUM_CLASSES {
            return Err(AdapterError::InferenceFailed(format!(
                "expected {CLASSIFIER_NUM_CLASSES} class scores, got {}",
                logits.len()
            )));
        }

        let probabilities = softmax(logits);
        let (best_idx, confidence) = argmax(&probabilities);
        let label = CLASS_LABELS[best_idx];

        tracing::debug!(%label, confidence, "classified skin photo");

        Ok(Classification {
            label: label.as_str().to_string(),
            confidence,
        })
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|e| e / sum).collect()
    } else {
        vec![1.0 / logits.len() as f32; logits.len()]
    }
}

/// Index and value of the largest probability.
fn argmax(probabilities: &[f32]) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > best {
            best = p;
            best_idx = i;
        }
    }
    (best_idx, best)
}
