//! Presentation of evaluation results
//!
//! [`Report`] turns one evaluation into console text or JSON. A
//! [`ErrorCode::NoRuleFired`](crate::error::ErrorCode::NoRuleFired) outcome is part of the report, not an error:
//! it renders as a neutral message. [`PlotData`] exports every membership
//! curve with the input and output markers for an external plotting tool.

use std::collections::HashMap;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;

use crate::decision::{DecisionMapper, Recommendation};
use crate::error::AdvisorResult;
use crate::fuzzy::{EvaluationResult, FuzzyValue, InferenceEngine, Role};

/// Line printed when the aggregate output set is empty
pub const NO_RULE_MESSAGE: &str = "No rule applies to these inputs; no suggestion can be made.";

// ============================================================================
// Report
// ============================================================================

/// What one evaluation concluded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Decision {
        score: f64,
        recommendation: Recommendation,
    },
    NoRuleFired {
        message: String,
    },
}

/// Firing strength of one rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleActivation {
    pub rule: String,
    pub strength: f64,
}

/// Strongest label of one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputReading {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant: Option<String>,
    pub degree: f64,
}

/// One evaluation, ready to print
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub inputs: IndexMap<String, InputReading>,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleActivation>,
}

impl Report {
    /// Evaluate `inputs` and capture the outcome
    ///
    /// Only a no-rule-fired evaluation is folded into the report; every other
    /// error (a missing input, for one) is returned.
    pub fn evaluate(engine: &InferenceEngine, inputs: &IndexMap<String, f64>) -> AdvisorResult<Self> {
        let values: HashMap<String, f64> = inputs.iter().map(|(k, v)| (k.clone(), *v)).collect();
        match engine.evaluate(&values) {
            Ok(result) => Ok(Self::from_result(engine, inputs, &result)),
            Err(e) if e.is_no_rule_fired() => Ok(Self::no_rule_fired(engine, inputs)),
            Err(e) => Err(e),
        }
    }

    pub fn no_rule_fired(engine: &InferenceEngine, inputs: &IndexMap<String, f64>) -> Self {
        Self {
            inputs: readings(engine, inputs),
            outcome: Outcome::NoRuleFired {
                message: NO_RULE_MESSAGE.to_string(),
            },
            rules: Vec::new(),
        }
    }

    pub fn from_result(
        engine: &InferenceEngine,
        inputs: &IndexMap<String, f64>,
        result: &EvaluationResult,
    ) -> Self {
        let rules = engine
            .rules()
            .iter()
            .zip(&result.per_rule_strength)
            .map(|(rule, strength)| RuleActivation {
                rule: rule.to_string(),
                strength: strength.value(),
            })
            .collect();

        Self {
            inputs: readings(engine, inputs),
            outcome: Outcome::Decision {
                score: result.crisp_output,
                recommendation: DecisionMapper::recommend(result.crisp_output),
            },
            rules,
        }
    }

    pub fn recommendation(&self) -> Option<Recommendation> {
        match self.outcome {
            Outcome::Decision { recommendation, .. } => Some(recommendation),
            Outcome::NoRuleFired { .. } => None,
        }
    }

    /// Console text; `show_rules` appends input readings and every rule's strength
    pub fn render_text(&self, show_rules: bool) -> String {
        let mut out = String::new();

        match &self.outcome {
            Outcome::Decision { score, recommendation } => {
                let _ = writeln!(out, "Decision Score: {:.2}", score);
                let _ = writeln!(out, "{}", recommendation.suggestion());
            }
            Outcome::NoRuleFired { message } => {
                let _ = writeln!(out, "{}", message);
            }
        }

        if show_rules {
            out.push_str("\nInputs:\n");
            for (name, reading) in &self.inputs {
                match &reading.dominant {
                    Some(label) => {
                        let _ = writeln!(out, "  {} = {} ({} {:.2})", name, reading.value, label, reading.degree);
                    }
                    None => {
                        let _ = writeln!(out, "  {} = {} (no label)", name, reading.value);
                    }
                }
            }

            if !self.rules.is_empty() {
                out.push_str("\nRules:\n");
                for activation in &self.rules {
                    let _ = writeln!(out, "  {:.2}  {}", activation.strength, activation.rule);
                }
            }
        }

        out
    }

    pub fn to_json(&self) -> AdvisorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn readings(engine: &InferenceEngine, inputs: &IndexMap<String, f64>) -> IndexMap<String, InputReading> {
    engine
        .antecedents()
        .iter()
        .filter_map(|var| {
            let value = *inputs.get(var.name())?;
            let dominant = var.dominant_term(value).filter(|(_, degree)| !degree.is_zero());
            Some((
                var.name().to_string(),
                InputReading {
                    value,
                    dominant: dominant.map(|(label, _)| label.to_string()),
                    degree: dominant.map_or(0.0, |(_, degree)| degree.value()),
                },
            ))
        })
        .collect()
}

// ============================================================================
// Plot data
// ============================================================================

/// Sampled fuzzy set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

impl Curve {
    fn sample(label: impl Into<String>, grid: impl Iterator<Item = (f64, FuzzyValue)>) -> Self {
        Self {
            label: label.into(),
            points: grid.map(|(x, mu)| [x, mu.value()]).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Input,
    Crisp,
}

/// Vertical line on a panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub value: f64,
}

/// Everything drawn for one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub variable: String,
    pub role: Role,
    pub curves: Vec<Curve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Curve>,
    /// Text placed next to the crisp marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

/// One panel per variable, antecedents first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotData {
    pub panels: Vec<Panel>,
}

impl PlotData {
    /// Collect curves and markers; without a `result` the output panel has no
    /// crisp marker and no aggregate curve
    pub fn new(
        engine: &InferenceEngine,
        inputs: &IndexMap<String, f64>,
        result: Option<&EvaluationResult>,
    ) -> Self {
        let mut panels: Vec<Panel> = engine
            .antecedents()
            .iter()
            .map(|var| Panel {
                variable: var.name().to_string(),
                role: var.role(),
                curves: var
                    .terms()
                    .map(|mf| Curve::sample(mf.label(), mf.grid(var.universe())))
                    .collect(),
                marker: inputs.get(var.name()).map(|&value| Marker {
                    kind: MarkerKind::Input,
                    value,
                }),
                aggregate: None,
                annotation: None,
            })
            .collect();

        let output = engine.consequent();
        panels.push(Panel {
            variable: output.name().to_string(),
            role: output.role(),
            curves: output
                .terms()
                .map(|mf| Curve::sample(mf.label(), mf.grid(output.universe())))
                .collect(),
            marker: result.map(|r| Marker {
                kind: MarkerKind::Crisp,
                value: r.crisp_output,
            }),
            aggregate: result.map(|r| Curve::sample("aggregate", engine.aggregate_curve(r))),
            annotation: result.map(|r| DecisionMapper::recommend(r.crisp_output).suggestion()),
        });

        Self { panels }
    }

    pub fn panel(&self, variable: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.variable == variable)
    }

    pub fn to_json(&self) -> AdvisorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
