//! Analysis engine thread.
//!
//! The ONNX session and OCR backend are not shareable across tasks, so a
//! dedicated OS thread owns both adapters and the knowledge base, serving
//! requests over an mpsc channel with oneshot replies. One request is in
//! flight per caller; there is no queueing policy, retry, or
//! engine-imposed deadline.

use dermascan_core::{
    AdapterError, ConditionClassifier, IngredientReport, KnowledgeBase, TextRecognizer,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("engine thread exited")]
    ChannelClosed,
}

/// Result of a skin-photo analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResult {
    /// Label produced by the classifier.
    pub label: String,
    /// Softmax confidence of the predicted class, in [0, 1].
    pub confidence: f32,
    /// Guidance text for the label. Unknown labels still yield renderable
    /// "not recognized" text rather than an error.
    pub guidance: String,
}

/// Messages sent from command handlers to the engine thread.
enum EngineRequest {
    Analyze {
        image: PathBuf,
        reply: oneshot::Sender<Result<AnalyzeResult, EngineError>>,
    },
    CheckIngredients {
        image: PathBuf,
        condition: String,
        reply: oneshot::Sender<Result<IngredientReport, EngineError>>,
    },
}

/// Clone-safe handle to the engine thread.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Classify a skin photo and look up guidance for the result.
    pub async fn analyze(&self, image: PathBuf) -> Result<AnalyzeResult, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Analyze {
                image,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)?
    }

    /// Recognize an ingredient label photo and evaluate it for a condition.
    pub async fn check_ingredients(
        &self,
        image: PathBuf,
        condition: String,
    ) -> Result<IngredientReport, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::CheckIngredients {
                image,
                condition,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)?
    }
}

/// Spawn the engine on a dedicated OS thread.
///
/// Adapters are constructed by the caller (fail-fast before spawning);
/// the thread takes ownership and enters a request loop.
pub fn spawn_engine<C, R>(
    mut classifier: C,
    mut recognizer: R,
    knowledge: KnowledgeBase,
) -> EngineHandle
where
    C: ConditionClassifier + Send + 'static,
    R: TextRecognizer + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<EngineRequest>(4);

    std::thread::Builder::new()
        .name("dermascan-engine".into())
        .spawn(move || {
            tracing::info!("engine thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    EngineRequest::Analyze { image, reply } => {
                        let result = run_analyze(&mut classifier, &knowledge, &image);
                        let _ = reply.send(result);
                    }
                    EngineRequest::CheckIngredients {
                        image,
                        condition,
                        reply,
                    } => {
                        let result =
                            run_check(&mut recognizer, &knowledge, &image, &condition);
                        let _ = reply.send(result);
                    }
                }
            }
            tracing::info!("engine thread exiting");
        })
        .expect("failed to spawn engine thread");

    EngineHandle { tx }
}

fn open_image(path: &Path) -> Result<image::DynamicImage, EngineError> {
    image::open(path).map_err(|source| EngineError::ImageRead {
        path: path.display().to_string(),
        source,
    })
}

/// Classify the photo, then map the label to guidance text.
fn run_analyze<C: ConditionClassifier>(
    classifier: &mut C,
    knowledge: &KnowledgeBase,
    image_path: &Path,
) -> Result<AnalyzeResult, EngineError> {
    let image = open_image(image_path)?;
    let classification = classifier.classify(&image)?;

    tracing::debug!(
        label = %classification.label,
        confidence = classification.confidence,
        "analyze: classified"
    );

    let guidance = knowledge
        .recommendation(&classification.label)
        .message()
        .to_string();

    Ok(AnalyzeResult {
        label: classification.label,
        confidence: classification.confidence,
        guidance,
    })
}

/// Recognize the label photo, then evaluate its text for the condition.
fn run_check<R: TextRecognizer>(
    recognizer: &mut R,
    knowledge: &KnowledgeBase,
    image_path: &Path,
    condition: &str,
) -> Result<IngredientReport, EngineError> {
    let image = open_image(image_path)?;
    let text = recognizer.recognize(&image)?;

    tracing::debug!(condition, chars = text.len(), "check: recognized text");

    Ok(knowledge.evaluate(condition, &text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dermascan_core::{Classification, Verdict};
    use image::DynamicImage;

    struct FixedClassifier {
        label: &'static str,
    }

    impl ConditionClassifier for FixedClassifier {
        fn classify(&mut self, _image: &DynamicImage) -> Result<Classification, AdapterError> {
            Ok(Classification {
                label: self.label.to_string(),
                confidence: 0.9,
            })
        }
    }

    struct FailingClassifier;

    impl ConditionClassifier for FailingClassifier {
        fn classify(&mut self, _image: &DynamicImage) -> Result<Classification, AdapterError> {
            Err(AdapterError::InferenceFailed("boom".into()))
        }
    }

    struct FixedRecognizer {
        text: &'static str,
    }

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&mut self, _image: &DynamicImage) -> Result<String, AdapterError> {
            Ok(self.text.to_string())
        }
    }

    fn test_image() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        DynamicImage::new_rgb8(8, 8).save(&path).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_analyze_known_condition() {
        let (_dir, path) = test_image();
        let engine = spawn_engine(
            FixedClassifier { label: "acne" },
            FixedRecognizer { text: "" },
            KnowledgeBase::builtin(),
        );

        let result = engine.analyze(path).await.unwrap();
        assert_eq!(result.label, "acne");
        assert!(result.guidance.starts_with("This looks like Acne."));
    }

    #[tokio::test]
    async fn test_analyze_unknown_label_still_renders() {
        let (_dir, path) = test_image();
        let engine = spawn_engine(
            FixedClassifier { label: "psoriasis" },
            FixedRecognizer { text: "" },
            KnowledgeBase::builtin(),
        );

        let result = engine.analyze(path).await.unwrap();
        assert_eq!(result.guidance, "Unable to determine condition.");
    }

    #[tokio::test]
    async fn test_analyze_adapter_failure_propagates() {
        let (_dir, path) = test_image();
        let engine = spawn_engine(
            FailingClassifier,
            FixedRecognizer { text: "" },
            KnowledgeBase::builtin(),
        );

        let err = engine.analyze(path).await.unwrap_err();
        assert!(matches!(err, EngineError::Adapter(_)));
    }

    #[tokio::test]
    async fn test_analyze_missing_image() {
        let engine = spawn_engine(
            FixedClassifier { label: "acne" },
            FixedRecognizer { text: "" },
            KnowledgeBase::builtin(),
        );

        let err = engine
            .analyze(PathBuf::from("/nonexistent/photo.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ImageRead { .. }));
    }

    #[tokio::test]
    async fn test_check_ingredients_verdict() {
        let (_dir, path) = test_image();
        let engine = spawn_engine(
            FixedClassifier { label: "acne" },
            FixedRecognizer {
                text: "Ingredients: Milk, Beans",
            },
            KnowledgeBase::builtin(),
        );

        let report = engine
            .check_ingredients(path, "acne".to_string())
            .await
            .unwrap();
        assert_eq!(report.verdict, Verdict::NotRecommended);
        assert_eq!(report.adverse_matches, vec!["Milk"]);
        assert_eq!(report.beneficial_matches, vec!["Beans"]);
    }

    #[tokio::test]
    async fn test_check_ingredients_empty_text() {
        let (_dir, path) = test_image();
        let engine = spawn_engine(
            FixedClassifier { label: "acne" },
            FixedRecognizer { text: "" },
            KnowledgeBase::builtin(),
        );

        let report = engine
            .check_ingredients(path, "eczema".to_string())
            .await
            .unwrap();
        assert_eq!(report.verdict, Verdict::NoRecommendation);
    }
}
