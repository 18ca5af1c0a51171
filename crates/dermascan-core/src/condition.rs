use serde::{Deserialize, Serialize};
use std::fmt;

/// A skin condition the classifier can produce.
///
/// Closed enumeration; label strings are matched case-insensitively.
/// Anything outside this set is an unknown label and must be surfaced
/// explicitly, never mapped to a default condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Acne,
    Carcinoma,
    Eczema,
    Keratosis,
    Milia,
    Rosacea,
}

impl Condition {
    /// All known conditions, in classifier output order.
    pub const ALL: [Condition; 6] = [
        Condition::Acne,
        Condition::Carcinoma,
        Condition::Eczema,
        Condition::Keratosis,
        Condition::Milia,
        Condition::Rosacea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Acne => "acne",
            Condition::Carcinoma => "carcinoma",
            Condition::Eczema => "eczema",
            Condition::Keratosis => "keratosis",
            Condition::Milia => "milia",
            Condition::Rosacea => "rosacea",
        }
    }

    /// Resolve a classifier label case-insensitively.
    ///
    /// Returns `None` for labels outside the enumeration.
    pub fn from_label(label: &str) -> Option<Condition> {
        match label.trim().to_ascii_lowercase().as_str() {
            "acne" => Some(Condition::Acne),
            "carcinoma" => Some(Condition::Carcinoma),
            "eczema" => Some(Condition::Eczema),
            "keratosis" => Some(Condition::Keratosis),
            "milia" => Some(Condition::Milia),
            "rosacea" => Some(Condition::Rosacea),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_lowercase() {
        assert_eq!(Condition::from_label("acne"), Some(Condition::Acne));
        assert_eq!(Condition::from_label("rosacea"), Some(Condition::Rosacea));
    }

    #[test]
    fn test_from_label_mixed_case() {
        assert_eq!(Condition::from_label("Eczema"), Some(Condition::Eczema));
        assert_eq!(Condition::from_label("KERATOSIS"), Some(Condition::Keratosis));
        assert_eq!(Condition::from_label("MiLiA"), Some(Condition::Milia));
    }

    #[test]
    fn test_from_label_trims_whitespace() {
        assert_eq!(Condition::from_label(" carcinoma\n"), Some(Condition::Carcinoma));
    }

    #[test]
    fn test_from_label_unknown() {
        assert_eq!(Condition::from_label("psoriasis"), None);
        assert_eq!(Condition::from_label(""), None);
    }

    #[test]
    fn test_display_round_trip() {
        for condition in Condition::ALL {
            assert_eq!(Condition::from_label(condition.as_str()), Some(condition));
        }
    }
}
