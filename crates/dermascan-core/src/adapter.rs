//! Contracts for the two external vision backends.
//!
//! The classifier and text recognizer are collaborators, not part of the
//! decision logic; these traits define the request/response seam so the
//! engine and tests can swap implementations.

use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("model file not found: {0}")]
    ModelNotFound(String),
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("image could not be processed: {0}")]
    Unprocessable(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

/// A classifier prediction: label plus softmax confidence.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Condition label as produced by the model. May fall outside the
    /// known enumeration; downstream lookup handles that explicitly.
    pub label: String,
    /// Probability of the predicted class, in [0, 1].
    pub confidence: f32,
}

/// Classifies a skin photo into a condition label.
pub trait ConditionClassifier {
    fn classify(&mut self, image: &DynamicImage) -> Result<Classification, AdapterError>;
}

/// Recognizes text in a photo of a product's ingredient label.
///
/// Returns recognized lines joined with `\n`. Finding no text is `Ok("")`,
/// not an error.
pub trait TextRecognizer {
    fn recognize(&mut self, image: &DynamicImage) -> Result<String, AdapterError>;
}
