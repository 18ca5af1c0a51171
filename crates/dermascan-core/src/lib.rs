//! dermascan-core — Skin-condition decision logic.
//!
//! Holds the condition knowledge base (guidance text plus beneficial and
//! adverse ingredient lists per condition), the recommendation lookup, the
//! ingredient evaluator, and the adapter contracts for the classifier and
//! text-recognition backends.

pub mod adapter;
pub mod condition;
pub mod evaluate;
pub mod knowledge;

pub use adapter::{AdapterError, Classification, ConditionClassifier, TextRecognizer};
pub use condition::Condition;
pub use evaluate::{IngredientReport, Verdict};
pub use knowledge::{ConditionProfile, KnowledgeBase, KnowledgeError, Recommendation};
