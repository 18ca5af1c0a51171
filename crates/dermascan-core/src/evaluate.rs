//! Ingredient evaluation against recognized label text.
//!
//! Matching is deliberately literal: each table entry is looked for as a
//! case-sensitive substring of the raw OCR text, exactly as written in the
//! table. No tokenization, so "Milk" also matches inside "Milkshake".

use crate::condition::Condition;
use crate::knowledge::KnowledgeBase;
use serde::Serialize;

/// Outcome of checking a product's ingredients against a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// At least one adverse ingredient matched. Takes priority over any
    /// beneficial matches.
    NotRecommended,
    /// No adverse matches and at least one beneficial match.
    Beneficial,
    /// Neither list matched.
    NoRecommendation,
    /// The condition label is outside the known enumeration.
    UnknownCondition,
}

impl Verdict {
    /// User-facing verdict sentence.
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::NotRecommended => {
                "The product contains ingredients that are not recommended for your condition."
            }
            Verdict::Beneficial => {
                "The product contains ingredients that are beneficial for your condition."
            }
            Verdict::NoRecommendation => {
                "The product's ingredients do not have a specific recommendation for your condition."
            }
            Verdict::UnknownCondition => "Unknown skin condition.",
        }
    }
}

/// Verdict plus the specific ingredient names that matched, in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientReport {
    pub verdict: Verdict,
    pub beneficial_matches: Vec<String>,
    pub adverse_matches: Vec<String>,
}

impl IngredientReport {
    fn unknown() -> Self {
        Self {
            verdict: Verdict::UnknownCondition,
            beneficial_matches: Vec::new(),
            adverse_matches: Vec::new(),
        }
    }

    /// Render the verdict and matched ingredient lists as display text.
    pub fn summary(&self) -> String {
        let mut text = self.verdict.message().to_string();
        if !self.beneficial_matches.is_empty() {
            text.push_str("\n\nGood Ingredients: ");
            text.push_str(&self.beneficial_matches.join(", "));
        }
        if !self.adverse_matches.is_empty() {
            text.push_str("\n\nBad Ingredients: ");
            text.push_str(&self.adverse_matches.join(", "));
        }
        text
    }
}

impl KnowledgeBase {
    /// Evaluate recognized label text against the ingredient lists for a
    /// condition.
    ///
    /// The label is resolved case-insensitively; unknown labels yield
    /// [`Verdict::UnknownCondition`] with empty match lists regardless of
    /// the text. Empty text is not an error, it simply matches nothing.
    /// Pure function of (label, text).
    pub fn evaluate(&self, label: &str, text: &str) -> IngredientReport {
        let Some(condition) = Condition::from_label(label) else {
            return IngredientReport::unknown();
        };
        let profile = self.profile(condition);

        let beneficial_matches = matches_in(text, &profile.beneficial);
        let adverse_matches = matches_in(text, &profile.adverse);

        let verdict = if !adverse_matches.is_empty() {
            Verdict::NotRecommended
        } else if !beneficial_matches.is_empty() {
            Verdict::Beneficial
        } else {
            Verdict::NoRecommendation
        };

        IngredientReport {
            verdict,
            beneficial_matches,
            adverse_matches,
        }
    }
}

/// Collect table entries occurring as literal substrings of `text`,
/// preserving table order.
fn matches_in(text: &str, entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| text.contains(entry.as_str()))
        .cloned()
        .collect()
}
