//! Fuzzy rules: a conjunction of antecedent terms implying one consequent label

use std::fmt;

use serde::{Deserialize, Serialize};

use super::membership::FuzzyValue;
use super::variable::FuzzifiedInputs;

/// One `(variable, label)` reference inside a rule antecedent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub variable: String,
    pub label: String,
}

impl Term {
    pub fn new(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.variable, self.label)
    }
}

/// A fuzzy rule
///
/// Antecedent terms are combined with fuzzy AND (minimum). Whether the
/// referenced variables and labels exist is checked when the rule is handed
/// to an [`InferenceEngine`](super::engine::InferenceEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule name/label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Antecedents (ANDed together)
    #[serde(rename = "when")]
    pub antecedents: Vec<Term>,
    /// Consequent label of the output variable
    #[serde(rename = "then")]
    pub consequent: String,
}

impl Rule {
    pub fn new(antecedents: Vec<Term>, consequent: impl Into<String>) -> Self {
        Self {
            name: None,
            antecedents,
            consequent: consequent.into(),
        }
    }

    /// Start a rule from its first antecedent term
    pub fn when(variable: impl Into<String>, label: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            antecedents: vec![Term::new(variable, label)],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Firing strength given fuzzified inputs keyed by variable name
    ///
    /// Returns `None` when a referenced variable or label is absent from
    /// `fuzzified`.
    pub fn strength(&self, fuzzified: &FuzzifiedInputs) -> Option<FuzzyValue> {
        self.antecedents.iter().try_fold(FuzzyValue::ONE, |acc, term| {
            fuzzified
                .get(&term.variable)
                .and_then(|degrees| degrees.get(&term.label))
                .map(|degree| acc.and(degree))
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.name {
            write!(f, "{}: ", name)?;
        }
        write!(f, "IF ")?;
        for (i, term) in self.antecedents.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", term)?;
        }
        write!(f, " THEN {}", self.consequent)
    }
}

/// Incremental rule construction: `Rule::when(..).and(..).then(..)`
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    antecedents: Vec<Term>,
}

impl RuleBuilder {
    pub fn and(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.antecedents.push(Term::new(variable, label));
        self
    }

    pub fn then(self, consequent: impl Into<String>) -> Rule {
        Rule::new(self.antecedents, consequent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::variable::Fuzzified;

    fn degrees(pairs: &[(&str, f64)]) -> Fuzzified {
        pairs
            .iter()
            .map(|(label, d)| (label.to_string(), FuzzyValue::new(*d)))
            .collect()
    }

    fn inputs() -> FuzzifiedInputs {
        let mut map = FuzzifiedInputs::new();
        map.insert(
            "market_index".to_string(),
            degrees(&[("low", 0.3), ("medium", 0.7), ("high", 0.0)]),
        );
        map.insert(
            "stock_trend".to_string(),
            degrees(&[("down", 0.1), ("steady", 0.9), ("up", 0.0)]),
        );
        map
    }

    #[test]
    fn test_strength_is_minimum() {
        let rule = Rule::when("market_index", "medium")
            .and("stock_trend", "steady")
            .then("hold");
        let strength = rule.strength(&inputs()).unwrap();
        assert!((strength.value() - 0.7).abs() < 1e-12);

        let rule = Rule::when("market_index", "low").and("stock_trend", "down").then("sell");
        assert!((rule.strength(&inputs()).unwrap().value() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_term_zeroes_rule() {
        let rule = Rule::when("market_index", "high").and("stock_trend", "steady").then("buy");
        assert_eq!(rule.strength(&inputs()), Some(FuzzyValue::ZERO));
    }

    #[test]
    fn test_unresolved_term() {
        let rule = Rule::when("market_index", "huge").then("buy");
        assert_eq!(rule.strength(&inputs()), None);

        let rule = Rule::when("volume", "high").then("buy");
        assert_eq!(rule.strength(&inputs()), None);
    }

    #[test]
    fn test_display() {
        let rule = Rule::when("market_index", "high")
            .and("stock_trend", "up")
            .then("buy")
            .with_name("rule3");
        assert_eq!(
            rule.to_string(),
            "rule3: IF market_index[high] AND stock_trend[up] THEN buy"
        );
    }

    #[test]
    fn test_serde_field_names() {
        let rule: Rule = serde_json::from_str(
            r#"{"when":[{"variable":"market_index","label":"low"}],"then":"sell"}"#,
        )
        .unwrap();
        assert_eq!(rule, Rule::when("market_index", "low").then("sell"));
    }
}
