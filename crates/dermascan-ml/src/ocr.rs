//! Ingredient-label text recognition via a local tesseract install.
//!
//! The image is handed to the `tesseract` binary through a temp file and
//! recognized lines come back joined with `\n`. Finding no text at all is a
//! normal outcome, not an error.

use dermascan_core::{AdapterError, TextRecognizer};
use image::DynamicImage;
use std::path::PathBuf;
use std::process::Command;

/// Text recognizer backed by the `tesseract` CLI.
pub struct TesseractRecognizer {
    binary: PathBuf,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check that the tesseract binary is runnable. Fail-fast at startup
    /// rather than on the first recognition request.
    pub fn probe(&self) -> Result<(), AdapterError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| {
                AdapterError::BackendUnavailable(format!("{}: {e}", self.binary.display()))
            })?;
        if !output.status.success() {
            return Err(AdapterError::BackendUnavailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            )));
        }
        tracing::info!(binary = %self.binary.display(), "tesseract available");
        Ok(())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&mut self, image: &DynamicImage) -> Result<String, AdapterError> {
        let dir = tempfile::tempdir()
            .map_err(|e| AdapterError::BackendUnavailable(format!("temp dir: {e}")))?;
        let input_path = dir.path().join("label.png");
        image
            .save(&input_path)
            .map_err(|e| AdapterError::Unprocessable(e.to_string()))?;

        let output = Command::new(&self.binary)
            .arg(&input_path)
            .arg("stdout")
            .output()
            .map_err(|e| {
                AdapterError::BackendUnavailable(format!("{}: {e}", self.binary.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AdapterError::InferenceFailed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = join_lines(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(chars = text.len(), "recognized label text");
        Ok(text)
    }
}

/// Join recognized lines with `\n`, dropping trailing whitespace and blank
/// lines the OCR engine emits between text blocks.
fn join_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_lines_drops_blanks() {
        let raw = "Ingredients: Milk\n\n\nSugar, Beans  \n";
        assert_eq!(join_lines(raw), "Ingredients: Milk\nSugar, Beans");
    }

    #[test]
    fn test_join_lines_empty_input() {
        assert_eq!(join_lines(""), "");
        assert_eq!(join_lines("\n\n"), "");
    }

    #[test]
    fn test_join_lines_preserves_case() {
        // Downstream ingredient matching is case-sensitive; recognition
        // must not fold case.
        assert_eq!(join_lines("Milk\nmilk"), "Milk\nmilk");
    }

    #[test]
    fn test_missing_binary_is_backend_unavailable() {
        let mut recognizer = TesseractRecognizer::new("/nonexistent/tesseract");
        let image = DynamicImage::new_rgb8(4, 4);
        let err = recognizer.recognize(&image).unwrap_err();
        assert!(matches!(err, AdapterError::BackendUnavailable(_)));
    }

    #[test]
    fn test_probe_missing_binary() {
        let recognizer = TesseractRecognizer::new("/nonexistent/tesseract");
        assert!(matches!(
            recognizer.probe().unwrap_err(),
            AdapterError::BackendUnavailable(_)
        ));
    }
}
