//! Condition knowledge base.
//!
//! Two static tables keyed by condition: a guidance paragraph and a pair of
//! ingredient lists (beneficial, adverse). The tables ship compiled in but
//! can be overridden by a TOML file of the same shape, so guidance text can
//! change without a rebuild.

use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse knowledge file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("knowledge base has no entry for condition '{0}'")]
    MissingCondition(Condition),
}

/// Guidance and ingredient lists for a single condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionProfile {
    pub guidance: String,
    /// Ingredient names beneficial for this condition, in table order.
    pub beneficial: Vec<String>,
    /// Ingredient names to avoid for this condition, in table order.
    pub adverse: Vec<String>,
}

/// Result of looking up guidance for a (possibly unknown) label.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation<'a> {
    Guidance(&'a str),
    NotRecognized,
}

impl Recommendation<'_> {
    /// User-facing text. Always renderable, including the unknown case.
    pub fn message(&self) -> &str {
        match self {
            Recommendation::Guidance(text) => text,
            Recommendation::NotRecognized => "Unable to determine condition.",
        }
    }
}

/// Immutable condition → profile mapping, complete over [`Condition::ALL`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    conditions: HashMap<Condition, ConditionProfile>,
}

impl KnowledgeBase {
    /// The compiled-in knowledge tables.
    pub fn builtin() -> Self {
        let mut conditions = HashMap::new();
        for condition in Condition::ALL {
            conditions.insert(condition, builtin_profile(condition));
        }
        Self { conditions }
    }

    /// Load a knowledge base from a TOML file.
    ///
    /// Fails if any condition in the enumeration is missing an entry;
    /// an incomplete table must never silently fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let kb = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), "knowledge base loaded");
        Ok(kb)
    }

    /// Parse a knowledge base from TOML text and validate completeness.
    pub fn from_toml_str(raw: &str) -> Result<Self, KnowledgeError> {
        let kb: Self = toml::from_str(raw)?;
        kb.validate()?;
        Ok(kb)
    }

    fn validate(&self) -> Result<(), KnowledgeError> {
        for condition in Condition::ALL {
            if !self.conditions.contains_key(&condition) {
                return Err(KnowledgeError::MissingCondition(condition));
            }
        }
        Ok(())
    }

    /// Profile for a known condition. Completeness is checked at
    /// construction, so every enumeration member has an entry.
    pub fn profile(&self, condition: Condition) -> &ConditionProfile {
        &self.conditions[&condition]
    }

    /// Look up guidance for a classifier label, matched case-insensitively.
    ///
    /// An unknown label yields [`Recommendation::NotRecognized`] rather than
    /// an error; the caller must still render something to the user.
    pub fn recommendation(&self, label: &str) -> Recommendation<'_> {
        match Condition::from_label(label) {
            Some(condition) => Recommendation::Guidance(&self.profile(condition).guidance),
            None => Recommendation::NotRecognized,
        }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_profile(condition: Condition) -> ConditionProfile {
    let (guidance, beneficial, adverse): (&str, &[&str], &[&str]) = match condition {
        Condition::Acne => (
            "This looks like Acne. You can use over-the-counter (OTC) medicated creams, cleansers, and spot treatments to help address pimples as they pop up. 2 common ingredients in acne cream that will help clear you skin is Benzoyl peroxide and Salicylic Acid. Benzoyl peroxide helps dry out existing pimples, prevents new ones from forming, and kills acne-causing bacteria. Salicylic acid helps exfoliate your skin to prevent pores from getting clogged with acne-causing bacteria. Some food ingredients to avoid eating to help treat your acne are milk, sugar, and refined grains. You should also avoid eating fast food and very processed food.",
            &["Beans", "Oats", "Omega-3 Fatty Acids"],
            &["Milk", "Sugar", "Grains"],
        ),
        Condition::Carcinoma => (
            "This looks like Carcinoma. To treat carcinoma, you can get surgery to remove the cancer cells or tumor. If the carcinoma has spread, you can treat it by undergoing chemotherapy, which kills cancer cells or prevents them from multiplying. Or, you can undergo radiation therapy which shrinks tumor before chemotherapy. Some foods that you should avoid are unpasteurized juice, cider, milk, yogurt and backyard eggs. You should also avoid chilled, ready-to-eat sandwiches, or deli-prepared salads made with egg, ham, chicken or seafood. Try to avoid soft cheeses made from unpasteurized milk, including most blue-veined cheeses, Brie, Camembert, feta, goat cheese, and queso fresco or queso blanco. Avoid eating raw or undercooked shellfish, including mussels, clams and oysters. Reheated starchy foods, including rice, pasta and couscous can be quite dangerous as well.",
            &["Oats", "Pasta", "Walnut", "Avocado"],
            &["Unpasteurized Juice", "Raw Shellfish", "Milk", "Eggs", "Yogurt", "Chicken", "Rice"],
        ),
        Condition::Eczema => (
            "This looks like Eczema. To treat eczema, you can apply topical medications to your skin as advised by your provider, like topical steroids. Furthermore, you can also take oral medications like anti-inflammatory medicines, antihistamines or corticosteroids to reduce itchiness and swelling. Light therapy also improve the appearance of your skin and remove blemishes. Avoid eating foods with the ingredients milk, eggs, wheat, soy, peanuts, tree nuts, and shellfish. Try not to eat processed foods either.",
            &["Oranges", "Bananas", "Beets", "Fish"],
            &["Milk", "Eggs", "Wheat", "Soy", "Peanuts", "Tree Nuts", "Shellfish"],
        ),
        Condition::Keratosis => (
            "This looks like Keratosis. To treat keratosis, you can use creams to remove dead skin cells and to prevent plugged follicles, such as tretinon or tazarotene creams. Some home remedies that treat keratosis are using warm water while showering and being gentle to your skin. This avoids irritating the skin which helps prevent worsening your condition. Avoid eating dairy products, soy, peanuts, trans fats, sugar, processed foods, fatty cuts of red meat, refined sugar, alcohol, sugary drinks, and fruit juices. If possible, try to eliminate gluten from your diet and avoid eating spicy foods.",
            &["Sardines", "Mackerel", "Salmon"],
            &["Milk", "Cheese", "Red Meat", "Soy", "Peanuts"],
        ),
        Condition::Milia => (
            "This looks like Milia. To treat milia, you can steam open your pores or exfoliate the area. To steam open your pores, sit in steam for 5-8 minutes, then pat your face dry and rinse with lukewarm water. For exfoliation, use an exfoliating cleanser like Paula's Choice Skin Perfecting 6% Mandelic Acid + 2% Lactic Acid Liquid Exfoliant or Peach & Lily Glass Skin Face Polisher. Be cautious not to exfoliate too often. Avoid eating milk, sugar, and refined grains, and try to steer clear of fast food and heavily processed foods.",
            &["Beans", "Oats", "Omega-3 Fatty Acids"],
            &["Milk", "Sugar", "Grains"],
        ),
        Condition::Rosacea => (
            "This looks like Rosacea. To treat rosacea, you can use medicated creams or gels such as brimonidine and oxymetazoline, which help reduce flushing by constricting blood vessels. Oral antibiotics like doxycycline, which require a prescription, can also be used. Additionally, laser treatments can improve the appearance of enlarged blood vessels and long-term redness. Avoid hot beverages, spicy foods, alcohol, dairy, foods containing cinnamaldehyde (e.g., citrus fruits, chocolate, cinnamon), and foods high in histamine (e.g., tomatoes, aged cheeses, legumes, processed meats, and nuts).",
            &["Oats", "Brown Rice", "Quinoa"],
            &["Oranges", "Alcohol", "Chocolate", "Cinnamon", "Tomatoes", "Cheese", "Nuts"],
        ),
    };

    ConditionProfile {
        guidance: guidance.to_string(),
        beneficial: beneficial.iter().map(|s| s.to_string()).collect(),
        adverse: adverse.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_complete() {
        let kb = KnowledgeBase::builtin();
        for condition in Condition::ALL {
            let profile = kb.profile(condition);
            assert!(!profile.guidance.is_empty());
            assert!(!profile.beneficial.is_empty());
            assert!(!profile.adverse.is_empty());
        }
    }

    #[test]
    fn test_recommendation_known_labels_any_casing() {
        let kb = KnowledgeBase::builtin();
        for condition in Condition::ALL {
            let expected = kb.profile(condition).guidance.clone();
            for label in [
                condition.as_str().to_string(),
                condition.as_str().to_uppercase(),
                {
                    // Title-case the label
                    let mut chars = condition.as_str().chars();
                    let first = chars.next().unwrap().to_uppercase().to_string();
                    format!("{first}{}", chars.as_str())
                },
            ] {
                assert_eq!(kb.recommendation(&label).message(), expected);
            }
        }
    }

    #[test]
    fn test_recommendation_unknown_label() {
        let kb = KnowledgeBase::builtin();
        let rec = kb.recommendation("psoriasis");
        assert_eq!(rec, Recommendation::NotRecognized);
        assert_eq!(rec.message(), "Unable to determine condition.");
        for condition in Condition::ALL {
            assert_ne!(rec.message(), kb.profile(condition).guidance);
        }
    }

    #[test]
    fn test_guidance_names_condition() {
        // Each paragraph opens by naming its own condition.
        let kb = KnowledgeBase::builtin();
        for condition in Condition::ALL {
            let guidance = &kb.profile(condition).guidance;
            let lower = guidance.to_ascii_lowercase();
            assert!(
                lower.starts_with(&format!("this looks like {}", condition.as_str())),
                "guidance for {condition} does not open with its name"
            );
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let kb = KnowledgeBase::builtin();
        let raw = toml::to_string(&kb).unwrap();
        let parsed = KnowledgeBase::from_toml_str(&raw).unwrap();
        for condition in Condition::ALL {
            assert_eq!(parsed.profile(condition).guidance, kb.profile(condition).guidance);
            assert_eq!(parsed.profile(condition).adverse, kb.profile(condition).adverse);
        }
    }

    #[test]
    fn test_missing_condition_rejected() {
        let raw = r#"
            [conditions.acne]
            guidance = "a"
            beneficial = ["Beans"]
            adverse = ["Milk"]
        "#;
        let err = KnowledgeBase::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, KnowledgeError::MissingCondition(_)));
    }

    #[test]
    fn test_override_replaces_builtin_text() {
        let mut raw = String::new();
        for condition in Condition::ALL {
            raw.push_str(&format!(
                "[conditions.{}]\nguidance = \"custom {}\"\nbeneficial = [\"Good\"]\nadverse = [\"Bad\"]\n\n",
                condition.as_str(),
                condition.as_str(),
            ));
        }
        let kb = KnowledgeBase::from_toml_str(&raw).unwrap();
        assert_eq!(kb.recommendation("Acne").message(), "custom acne");
        assert_eq!(kb.profile(Condition::Rosacea).beneficial, vec!["Good"]);
    }
}
