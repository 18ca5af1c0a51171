//! dermascan-ml — Vision backends for dermascan.
//!
//! Wraps the ONNX skin-condition classifier and the tesseract-based text
//! recognizer behind the adapter traits from `dermascan-core`, running both
//! on CPU with no network access.

pub mod classifier;
pub mod ocr;

pub use classifier::SkinClassifier;
pub use ocr::TesseractRecognizer;

use std::path::PathBuf;

/// Default directory for bundled ONNX models.
pub fn default_model_dir() -> PathBuf {
    PathBuf::from("/usr/share/dermascan/models")
}
