//! Linguistic variables

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::membership::{FuzzyValue, Grid, MembershipFunction, Shape};
use super::universe::Universe;
use crate::error::{AdvisorError, AdvisorResult, ErrorCode};

/// Whether a variable feeds rules or receives their conclusions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Antecedent,
    Consequent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Antecedent => "antecedent",
            Role::Consequent => "consequent",
        }
    }
}

/// Degree per label, in label definition order
pub type Fuzzified = IndexMap<String, FuzzyValue>;

/// Fuzzified degrees per variable name
pub type FuzzifiedInputs = IndexMap<String, Fuzzified>;

/// A named variable with a universe and labelled fuzzy sets
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, role: Role, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: IndexMap::new(),
        }
    }

    pub fn antecedent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Antecedent, universe)
    }

    pub fn consequent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Consequent, universe)
    }

    /// Add a term; labels must be unique within the variable
    pub fn add_term(&mut self, membership: MembershipFunction) -> AdvisorResult<()> {
        if self.terms.contains_key(membership.label()) {
            return Err(AdvisorError::duplicate_label(&self.name, membership.label()));
        }
        self.terms.insert(membership.label().to_string(), membership);
        Ok(())
    }

    /// Builder form of [`add_term`](Self::add_term)
    pub fn with_term(mut self, label: impl Into<String>, shape: Shape) -> AdvisorResult<Self> {
        let membership = MembershipFunction::new(label, shape)
            .map_err(|e| e.with_context("variable", self.name.as_str()))?;
        self.add_term(membership)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, label: &str) -> Option<&MembershipFunction> {
        self.terms.get(label)
    }

    pub fn terms(&self) -> impl Iterator<Item = &MembershipFunction> {
        self.terms.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.terms.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Fuzzify a crisp value - get membership for all terms
    ///
    /// Values outside the universe are not rejected; sets that do not cover
    /// them simply report zero.
    pub fn fuzzify(&self, value: f64) -> Fuzzified {
        self.terms
            .iter()
            .map(|(label, mf)| (label.clone(), mf.degree(value)))
            .collect()
    }

    /// Label with the highest membership; the earliest label wins ties
    pub fn dominant_term(&self, value: f64) -> Option<(&str, FuzzyValue)> {
        self.terms
            .iter()
            .map(|(label, mf)| (label.as_str(), mf.degree(value)))
            .fold(None, |best, (label, degree)| match best {
                Some((_, d)) if d >= degree => best,
                _ => Some((label, degree)),
            })
    }

    /// Sampled curve for `label` over this variable's universe
    pub fn grid(&self, label: &str) -> Option<Grid<'_>> {
        self.terms.get(label).map(|mf| mf.grid(&self.universe))
    }

    pub(crate) fn ensure_role(&self, expected: Role) -> AdvisorResult<()> {
        if self.role != expected {
            return Err(AdvisorError::new(
                ErrorCode::RoleMismatch,
                format!(
                    "Variable '{}' is declared as {} but used as {}",
                    self.name,
                    self.role.as_str(),
                    expected.as_str()
                ),
            )
            .with_context("variable", self.name.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend() -> LinguisticVariable {
        LinguisticVariable::antecedent("stock_trend", Universe::integer(-10, 10).unwrap())
            .with_term("down", Shape::Triangular(-10.0, -10.0, 0.0))
            .unwrap()
            .with_term("steady", Shape::Triangular(-5.0, 0.0, 5.0))
            .unwrap()
            .with_term("up", Shape::Triangular(0.0, 10.0, 10.0))
            .unwrap()
    }

    #[test]
    fn test_fuzzify_covers_every_label() {
        let var = trend();
        let degrees = var.fuzzify(-2.5);

        let labels: Vec<&str> = degrees.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["down", "steady", "up"]);
        assert!((degrees["down"].value() - 0.25).abs() < 1e-12);
        assert!((degrees["steady"].value() - 0.5).abs() < 1e-12);
        assert_eq!(degrees["up"], FuzzyValue::ZERO);
    }

    #[test]
    fn test_out_of_range_saturates_to_zero() {
        let var = trend();
        for value in [-50.0, 42.0] {
            let degrees = var.fuzzify(value);
            assert!(degrees.values().all(|d| d.is_zero()));
        }
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = trend()
            .with_term("up", Shape::Triangular(5.0, 10.0, 10.0))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateLabel);
        assert_eq!(err.context_field("variable"), Some("stock_trend"));
    }

    #[test]
    fn test_malformed_term_carries_variable() {
        let err = trend()
            .with_term("crash", Shape::Triangular(0.0, -5.0, -10.0))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);
        assert_eq!(err.context_field("variable"), Some("stock_trend"));
    }

    #[test]
    fn test_dominant_term() {
        let var = trend();
        assert_eq!(var.dominant_term(7.0).map(|(l, _)| l), Some("up"));
        let (label, degree) = var.dominant_term(-5.0).unwrap();
        assert_eq!(label, "down");
        assert!((degree.value() - 0.5).abs() < 1e-12);

        let twins = LinguisticVariable::antecedent("x", Universe::integer(0, 10).unwrap())
            .with_term("first", Shape::Triangular(0.0, 5.0, 10.0))
            .unwrap()
            .with_term("second", Shape::Triangular(0.0, 5.0, 10.0))
            .unwrap();
        assert_eq!(twins.dominant_term(3.0).map(|(l, _)| l), Some("first"));
    }

    #[test]
    fn test_grid_by_label() {
        let var = trend();
        let curve: Vec<_> = var.grid("steady").unwrap().collect();
        assert_eq!(curve.len(), 21);
        assert_eq!(curve[10], (0.0, FuzzyValue::ONE));
        assert!(var.grid("sideways").is_none());
    }

    #[test]
    fn test_role_check() {
        let var = trend();
        assert!(var.ensure_role(Role::Antecedent).is_ok());
        let err = var.ensure_role(Role::Consequent).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleMismatch);
    }
}
