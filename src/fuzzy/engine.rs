//! Mamdani inference engine
//!
//! Evaluation runs in four passes over immutable state:
//! 1. fuzzify every antecedent variable at its crisp input
//! 2. compute each rule's firing strength (min over its terms)
//! 3. aggregate strengths per consequent label (max over rules)
//! 4. defuzzify the clipped, max-combined output set by centroid
//!
//! The engine keeps no per-call state, so one instance can serve
//! concurrent evaluations from several threads.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::membership::FuzzyValue;
use super::rule::Rule;
use super::variable::{Fuzzified, FuzzifiedInputs, LinguisticVariable, Role};
use crate::error::{AdvisorError, AdvisorResult, ErrorCode};

/// Output of a single evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// Degrees of every antecedent label at the supplied inputs
    pub fuzzified: FuzzifiedInputs,
    /// Firing strength per rule, parallel to the engine's rule base
    pub per_rule_strength: Vec<FuzzyValue>,
    /// Aggregated activation per consequent label, zero when no rule concludes it
    pub per_label_activation: IndexMap<String, FuzzyValue>,
    /// Centroid of the aggregate output set
    pub crisp_output: f64,
}

impl EvaluationResult {
    /// Rules that fired (strength above zero), with their index and strength
    pub fn fired_rules(&self) -> impl Iterator<Item = (usize, FuzzyValue)> + '_ {
        self.per_rule_strength
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, s)| !s.is_zero())
    }

    pub fn activation(&self, label: &str) -> Option<FuzzyValue> {
        self.per_label_activation.get(label).copied()
    }
}

/// Fuzzy inference system over a fixed rule base
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    antecedents: Vec<LinguisticVariable>,
    consequent: LinguisticVariable,
    rules: Vec<Rule>,
}

impl InferenceEngine {
    /// Build an engine, validating every variable and rule reference
    ///
    /// Fails with a configuration error on empty variables or rule base,
    /// duplicate variable names, role mismatches, and rules that reference
    /// unknown variables or labels.
    pub fn new(
        antecedents: Vec<LinguisticVariable>,
        consequent: LinguisticVariable,
        rules: Vec<Rule>,
    ) -> AdvisorResult<Self> {
        if antecedents.is_empty() {
            return Err(AdvisorError::config("An inference engine needs at least one antecedent variable"));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(antecedents.len() + 1);
        for var in antecedents.iter() {
            var.ensure_role(Role::Antecedent)?;
            check_variable(var, &mut seen)?;
        }
        consequent.ensure_role(Role::Consequent)?;
        check_variable(&consequent, &mut seen)?;

        crate::advisor_ensure!(!rules.is_empty(), ErrorCode::EmptyRule, "The rule base is empty");

        for (i, rule) in rules.iter().enumerate() {
            let rule_name = rule
                .name
                .clone()
                .unwrap_or_else(|| format!("rule {}", i + 1));

            if rule.antecedents.is_empty() {
                return Err(AdvisorError::new(
                    ErrorCode::EmptyRule,
                    format!("{} has no antecedent terms", rule_name),
                )
                .with_context("rule", rule_name));
            }

            for term in &rule.antecedents {
                let var = antecedents
                    .iter()
                    .find(|v| v.name() == term.variable)
                    .ok_or_else(|| AdvisorError::unknown_variable(&rule_name, &term.variable))?;
                if !var.has_label(&term.label) {
                    return Err(AdvisorError::unknown_label(&rule_name, &term.variable, &term.label));
                }
            }

            if !consequent.has_label(&rule.consequent) {
                return Err(AdvisorError::unknown_label(
                    &rule_name,
                    consequent.name(),
                    &rule.consequent,
                ));
            }
        }

        debug!(
            antecedents = antecedents.len(),
            consequent = consequent.name(),
            rules = rules.len(),
            "inference engine built"
        );

        Ok(Self {
            antecedents,
            consequent,
            rules,
        })
    }

    pub fn antecedents(&self) -> &[LinguisticVariable] {
        &self.antecedents
    }

    pub fn consequent(&self) -> &LinguisticVariable {
        &self.consequent
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up any variable, input or output, by name
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.antecedents
            .iter()
            .chain(std::iter::once(&self.consequent))
            .find(|v| v.name() == name)
    }

    /// Evaluate the rule base for one set of crisp inputs
    ///
    /// `inputs` must hold a value for every antecedent variable; extra
    /// entries are ignored. Fails with [`ErrorCode::NoRuleFired`] when the
    /// aggregate output set carries no mass.
    pub fn evaluate(&self, inputs: &HashMap<String, f64>) -> AdvisorResult<EvaluationResult> {
        let fuzzified = self.fuzzify(inputs)?;

        let per_rule_strength = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                rule.strength(&fuzzified).ok_or_else(|| {
                    AdvisorError::new(
                        ErrorCode::UnexpectedState,
                        format!("rule {} references a term missing from the fuzzified inputs", i + 1),
                    )
                })
            })
            .collect::<AdvisorResult<Vec<_>>>()?;

        for (rule, strength) in self.rules.iter().zip(&per_rule_strength) {
            debug!(rule = %rule, strength = strength.value(), "rule evaluated");
        }

        let per_label_activation = self.aggregate(&per_rule_strength);
        let crisp_output = self.defuzzify(&per_label_activation)?;

        debug!(crisp = crisp_output, "defuzzified output");

        Ok(EvaluationResult {
            fuzzified,
            per_rule_strength,
            per_label_activation,
            crisp_output,
        })
    }

    /// Convenience form of [`evaluate`](Self::evaluate) taking `(name, value)` pairs
    pub fn evaluate_pairs(&self, inputs: &[(&str, f64)]) -> AdvisorResult<EvaluationResult> {
        let map: HashMap<String, f64> = inputs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        self.evaluate(&map)
    }

    fn fuzzify(&self, inputs: &HashMap<String, f64>) -> AdvisorResult<FuzzifiedInputs> {
        self.antecedents
            .iter()
            .map(|var| -> AdvisorResult<(String, Fuzzified)> {
                let value = inputs
                    .get(var.name())
                    .copied()
                    .ok_or_else(|| AdvisorError::missing_input(var.name()))?;
                let degrees = var.fuzzify(value);
                trace!(variable = var.name(), value, degrees = ?degrees, "fuzzified input");
                Ok((var.name().to_string(), degrees))
            })
            .collect()
    }

    /// Max of rule strengths per consequent label, in label definition order
    fn aggregate(&self, strengths: &[FuzzyValue]) -> IndexMap<String, FuzzyValue> {
        let mut activation: IndexMap<String, FuzzyValue> = self
            .consequent
            .labels()
            .map(|label| (label.to_string(), FuzzyValue::ZERO))
            .collect();

        for (rule, strength) in self.rules.iter().zip(strengths) {
            if let Some(slot) = activation.get_mut(&rule.consequent) {
                *slot = slot.or(strength);
            }
        }

        activation
    }

    /// Aggregate output degree at `y`: max over labels of the clipped sets
    pub fn aggregate_at(&self, y: f64, activation: &IndexMap<String, FuzzyValue>) -> FuzzyValue {
        self.consequent
            .terms()
            .filter_map(|mf| activation.get(mf.label()).map(|a| mf.clipped(y, *a)))
            .fold(FuzzyValue::ZERO, |acc, v| acc.or(&v))
    }

    /// Centroid over the output grid; zero total mass means no rule applied
    fn defuzzify(&self, activation: &IndexMap<String, FuzzyValue>) -> AdvisorResult<f64> {
        let (numerator, denominator) = self
            .consequent
            .universe()
            .points()
            .map(|y| (y, self.aggregate_at(y, activation).value()))
            .fold((0.0, 0.0), |(num, den), (y, m)| (num + y * m, den + m));

        if denominator <= 0.0 {
            warn!(
                consequent = self.consequent.name(),
                "no rule fired; aggregate output set is empty"
            );
            return Err(AdvisorError::no_rule_fired().with_context("consequent", self.consequent.name()));
        }

        Ok(numerator / denominator)
    }

    /// Sampled aggregate output set for a finished evaluation
    pub fn aggregate_curve<'a>(
        &'a self,
        result: &'a EvaluationResult,
    ) -> impl Iterator<Item = (f64, FuzzyValue)> + Clone + 'a {
        self.consequent
            .universe()
            .points()
            .map(move |y| (y, self.aggregate_at(y, &result.per_label_activation)))
    }

    /// Sampled consequent set for `label`, capped at `activation`
    pub fn clipped_curve(
        &self,
        label: &str,
        activation: FuzzyValue,
    ) -> Option<impl Iterator<Item = (f64, FuzzyValue)> + Clone + '_> {
        let mf = self.consequent.term(label)?;
        Some(
            self.consequent
                .universe()
                .points()
                .map(move |y| (y, mf.clipped(y, activation))),
        )
    }
}

fn check_variable<'a>(var: &'a LinguisticVariable, seen: &mut Vec<&'a str>) -> AdvisorResult<()> {
    if seen.contains(&var.name()) {
        return Err(AdvisorError::duplicate_variable(var.name()));
    }
    if var.is_empty() {
        return Err(AdvisorError::new(
            ErrorCode::EmptyVariable,
            format!("Variable '{}' defines no labels", var.name()),
        )
        .with_context("variable", var.name()));
    }
    seen.push(var.name());
    Ok(())
}
