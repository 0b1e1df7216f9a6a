//! Mapping crisp decision scores to recommendations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete trading recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Sell,
    Hold,
    Buy,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Sell => "Sell",
            Recommendation::Hold => "Hold",
            Recommendation::Buy => "Buy",
        }
    }

    /// Console line shown to the user
    pub fn suggestion(&self) -> String {
        format!("Suggestion : {}", self.as_str())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static threshold table over the 0..=100 decision score
///
/// `score < 33` sells, `score > 66` buys, and both boundaries belong to hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionMapper;

impl DecisionMapper {
    /// Lowest score that still holds
    pub const HOLD_FROM: f64 = 33.0;
    /// Highest score that still holds
    pub const HOLD_TO: f64 = 66.0;

    pub fn recommend(score: f64) -> Recommendation {
        if score < Self::HOLD_FROM {
            Recommendation::Sell
        } else if score <= Self::HOLD_TO {
            Recommendation::Hold
        } else {
            Recommendation::Buy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(DecisionMapper::recommend(0.0), Recommendation::Sell);
        assert_eq!(DecisionMapper::recommend(16.33), Recommendation::Sell);
        assert_eq!(DecisionMapper::recommend(50.0), Recommendation::Hold);
        assert_eq!(DecisionMapper::recommend(80.82), Recommendation::Buy);
        assert_eq!(DecisionMapper::recommend(100.0), Recommendation::Buy);
    }

    #[test]
    fn test_boundaries_are_hold() {
        assert_eq!(DecisionMapper::recommend(32.999), Recommendation::Sell);
        assert_eq!(DecisionMapper::recommend(33.0), Recommendation::Hold);
        assert_eq!(DecisionMapper::recommend(66.0), Recommendation::Hold);
        assert_eq!(DecisionMapper::recommend(66.001), Recommendation::Buy);
    }

    #[test]
    fn test_suggestion_text() {
        assert_eq!(Recommendation::Sell.suggestion(), "Suggestion : Sell");
        assert_eq!(Recommendation::Hold.suggestion(), "Suggestion : Hold");
        assert_eq!(Recommendation::Buy.suggestion(), "Suggestion : Buy");
        assert_eq!(
            serde_json::to_string(&Recommendation::Buy).unwrap(),
            r#""buy""#
        );
    }
}
