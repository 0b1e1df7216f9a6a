//! Serializable description of a fuzzy model
//!
//! A [`ModelConfig`] lists every variable with its universe and labelled
//! shapes, plus the rule base. It is plain data: validation happens in
//! [`ModelConfig::build`], which either yields a complete
//! [`InferenceEngine`] or the first configuration error.

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, AdvisorResult, ErrorCode};
use crate::fuzzy::{
    InferenceEngine, LinguisticVariable, MembershipFunction, Role, Rule, Shape, Universe,
    UniverseSpec,
};

/// Name of the market index input in the reference model
pub const MARKET_INDEX: &str = "market_index";
/// Name of the trend input in the reference model
pub const STOCK_TREND: &str = "stock_trend";
/// Name of the output variable in the reference model
pub const DECISION: &str = "decision";

/// Variables and rules of one inference system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub variables: Vec<VariableConfig>,
    pub rules: Vec<Rule>,
}

/// One linguistic variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub role: Role,
    pub universe: UniverseSpec,
    pub terms: Vec<TermConfig>,
}

/// One labelled fuzzy set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub label: String,
    pub shape: Shape,
}

impl TermConfig {
    pub fn new(label: impl Into<String>, shape: Shape) -> Self {
        Self {
            label: label.into(),
            shape,
        }
    }
}

impl VariableConfig {
    fn build(&self) -> AdvisorResult<LinguisticVariable> {
        let universe = Universe::try_from(self.universe)
            .map_err(|e| e.with_context("variable", self.name.as_str()))?;
        let mut var = LinguisticVariable::new(self.name.clone(), self.role, universe);
        for term in &self.terms {
            let mf = MembershipFunction::new(term.label.clone(), term.shape)
                .map_err(|e| e.with_context("variable", self.name.as_str()))?;
            var.add_term(mf)?;
        }
        Ok(var)
    }

    fn from_variable(var: &LinguisticVariable) -> Self {
        Self {
            name: var.name().to_string(),
            role: var.role(),
            universe: var.universe().spec(),
            terms: var
                .terms()
                .map(|mf| TermConfig::new(mf.label(), *mf.shape()))
                .collect(),
        }
    }
}

impl ModelConfig {
    /// The market advisor: index and trend in, a 0..=100 decision score out
    pub fn reference() -> Self {
        let triangle = |label: &str, a: f64, b: f64, c: f64| TermConfig::new(label, Shape::Triangular(a, b, c));

        let variables = vec![
            VariableConfig {
                name: MARKET_INDEX.to_string(),
                role: Role::Antecedent,
                universe: UniverseSpec { min: 3000.0, max: 5000.0, step: 1.0 },
                terms: vec![
                    triangle("low", 3000.0, 3000.0, 4000.0),
                    triangle("medium", 3500.0, 4000.0, 4500.0),
                    triangle("high", 4000.0, 5000.0, 5000.0),
                ],
            },
            VariableConfig {
                name: STOCK_TREND.to_string(),
                role: Role::Antecedent,
                universe: UniverseSpec { min: -10.0, max: 10.0, step: 1.0 },
                terms: vec![
                    triangle("down", -10.0, -10.0, 0.0),
                    triangle("steady", -5.0, 0.0, 5.0),
                    triangle("up", 0.0, 10.0, 10.0),
                ],
            },
            VariableConfig {
                name: DECISION.to_string(),
                role: Role::Consequent,
                universe: UniverseSpec { min: 0.0, max: 100.0, step: 1.0 },
                terms: vec![
                    triangle("sell", 0.0, 0.0, 50.0),
                    triangle("hold", 25.0, 50.0, 75.0),
                    triangle("buy", 50.0, 100.0, 100.0),
                ],
            },
        ];

        let rules = vec![
            Rule::when(MARKET_INDEX, "low").and(STOCK_TREND, "down").then("sell"),
            Rule::when(MARKET_INDEX, "medium").and(STOCK_TREND, "steady").then("hold"),
            Rule::when(MARKET_INDEX, "high").and(STOCK_TREND, "up").then("buy"),
            Rule::when(MARKET_INDEX, "high").and(STOCK_TREND, "down").then("sell"),
            Rule::when(MARKET_INDEX, "medium").and(STOCK_TREND, "up").then("buy"),
            Rule::when(MARKET_INDEX, "low").and(STOCK_TREND, "steady").then("hold"),
        ];

        Self { variables, rules }
    }

    /// Validate and assemble the engine
    pub fn build(&self) -> AdvisorResult<InferenceEngine> {
        let mut antecedents = Vec::new();
        let mut consequents = Vec::new();
        for spec in &self.variables {
            let var = spec.build()?;
            match var.role() {
                Role::Antecedent => antecedents.push(var),
                Role::Consequent => consequents.push(var),
            }
        }

        let consequent = match consequents.len() {
            1 => consequents.remove(0),
            0 => {
                return Err(AdvisorError::new(
                    ErrorCode::RoleMismatch,
                    "The model declares no consequent variable",
                ))
            }
            n => {
                return Err(AdvisorError::new(
                    ErrorCode::RoleMismatch,
                    format!("The model declares {} consequent variables; exactly one is supported", n),
                ))
            }
        };

        InferenceEngine::new(antecedents, consequent, self.rules.clone())
    }

    /// Describe an existing engine; antecedents first, then the consequent
    pub fn from_engine(engine: &InferenceEngine) -> Self {
        let variables = engine
            .antecedents()
            .iter()
            .chain(std::iter::once(engine.consequent()))
            .map(VariableConfig::from_variable)
            .collect();

        Self {
            variables,
            rules: engine.rules().to_vec(),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&VariableConfig> {
        self.variables.iter().find(|v| v.name == name)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{DecisionMapper, Recommendation};

    fn advise(engine: &InferenceEngine, market: f64, trend: f64) -> (f64, Recommendation) {
        let result = engine
            .evaluate_pairs(&[(MARKET_INDEX, market), (STOCK_TREND, trend)])
            .unwrap();
        (result.crisp_output, DecisionMapper::recommend(result.crisp_output))
    }

    #[test]
    fn test_reference_scenarios() {
        let engine = ModelConfig::reference().build().unwrap();

        let (score, rec) = advise(&engine, 4500.0, 5.0);
        assert!(score > 66.0);
        assert_eq!(rec, Recommendation::Buy);

        let (score, rec) = advise(&engine, 3500.0, 0.0);
        assert!((33.0..=66.0).contains(&score));
        assert_eq!(rec, Recommendation::Hold);

        let (score, rec) = advise(&engine, 3000.0, -10.0);
        assert!(score < 33.0);
        assert_eq!(rec, Recommendation::Sell);
    }

    #[test]
    fn test_reference_dead_zone() {
        let engine = ModelConfig::reference().build().unwrap();
        let err = engine
            .evaluate_pairs(&[(MARKET_INDEX, 4000.0), (STOCK_TREND, -10.0)])
            .unwrap_err();
        assert!(err.is_no_rule_fired());
    }

    #[test]
    fn test_engine_round_trip() {
        let engine = ModelConfig::reference().build().unwrap();
        let described = ModelConfig::from_engine(&engine);
        assert_eq!(described, ModelConfig::reference());
    }

    #[test]
    fn test_json_round_trip_is_bit_identical() {
        let original = ModelConfig::reference().build().unwrap();
        let json = serde_json::to_string(&ModelConfig::from_engine(&original)).unwrap();
        let rebuilt: ModelConfig = serde_json::from_str(&json).unwrap();
        let rebuilt = rebuilt.build().unwrap();

        for (m, t) in [(4500.0, 5.0), (3500.0, 0.0), (3000.0, -10.0), (3821.7, 1.3)] {
            let a = original.evaluate_pairs(&[(MARKET_INDEX, m), (STOCK_TREND, t)]).unwrap();
            let b = rebuilt.evaluate_pairs(&[(MARKET_INDEX, m), (STOCK_TREND, t)]).unwrap();
            assert_eq!(a.crisp_output.to_bits(), b.crisp_output.to_bits());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_bad_universe_names_variable() {
        let mut model = ModelConfig::reference();
        model.variables[1].universe.step = 0.0;
        let err = model.build().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidUniverse);
        assert_eq!(err.context_field("variable"), Some(STOCK_TREND));
    }

    #[test]
    fn test_bad_shape_names_variable() {
        let mut model = ModelConfig::reference();
        model.variables[2].terms[1].shape = Shape::Triangular(75.0, 50.0, 25.0);
        let err = model.build().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);
        assert_eq!(err.context_field("variable"), Some(DECISION));
        assert_eq!(err.context_field("label"), Some("hold"));
    }

    #[test]
    fn test_duplicate_label() {
        let mut model = ModelConfig::reference();
        model.variables[0]
            .terms
            .push(TermConfig::new("low", Shape::Triangular(3000.0, 3100.0, 3200.0)));
        let err = model.build().unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateLabel);
    }

    #[test]
    fn test_consequent_count() {
        let mut model = ModelConfig::reference();
        model.variables.pop();
        assert_eq!(model.build().unwrap_err().code, ErrorCode::RoleMismatch);

        let mut model = ModelConfig::reference();
        let mut extra = model.variables[2].clone();
        extra.name = "conviction".to_string();
        model.variables.push(extra);
        let err = model.build().unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleMismatch);
        assert!(err.message.contains("2 consequent"));
    }
}
