use dermascan_core::{KnowledgeBase, KnowledgeError};
use std::path::PathBuf;

/// CLI configuration, loaded from environment variables.
pub struct Config {
    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,
    /// Optional TOML override for the built-in knowledge base.
    pub knowledge_path: Option<PathBuf>,
    /// Name or path of the tesseract binary.
    pub tesseract_bin: String,
}

impl Config {
    /// Load configuration from `DERMASCAN_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        let model_dir = std::env::var("DERMASCAN_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dermascan_ml::default_model_dir());

        Self {
            model_dir,
            knowledge_path: std::env::var("DERMASCAN_KNOWLEDGE_PATH")
                .map(PathBuf::from)
                .ok(),
            tesseract_bin: std::env::var("DERMASCAN_TESSERACT_BIN")
                .unwrap_or_else(|_| "tesseract".to_string()),
        }
    }

    /// Path to the skin-condition classification model.
    pub fn classifier_model_path(&self) -> String {
        self.model_dir
            .join("skin_condition.onnx")
            .to_string_lossy()
            .into_owned()
    }

    /// The knowledge base: the TOML override when configured, otherwise the
    /// compiled-in tables.
    pub fn knowledge(&self) -> Result<KnowledgeBase, KnowledgeError> {
        match &self.knowledge_path {
            Some(path) => KnowledgeBase::load(path),
            None => Ok(KnowledgeBase::builtin()),
        }
    }
}
