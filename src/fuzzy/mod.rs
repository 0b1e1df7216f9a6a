//! Mamdani fuzzy inference
//!
//! This module provides the inference core:
//! - Discretized universes of discourse
//! - Membership functions (triangular, trapezoidal, gaussian)
//! - Linguistic variables and fuzzification
//! - Conjunctive rules and firing strength
//! - Max aggregation and centroid defuzzification
//!
//! # Usage
//!
//! ```ignore
//! use fuzzy_advisor::fuzzy::{InferenceEngine, LinguisticVariable, Rule, Shape, Universe};
//!
//! let trend = LinguisticVariable::antecedent("stock_trend", Universe::integer(-10, 10)?)
//!     .with_term("down", Shape::Triangular(-10.0, -10.0, 0.0))?
//!     .with_term("up", Shape::Triangular(0.0, 10.0, 10.0))?;
//! let decision = LinguisticVariable::consequent("decision", Universe::integer(0, 100)?)
//!     .with_term("sell", Shape::Triangular(0.0, 0.0, 50.0))?
//!     .with_term("buy", Shape::Triangular(50.0, 100.0, 100.0))?;
//!
//! let engine = InferenceEngine::new(
//!     vec![trend],
//!     decision,
//!     vec![
//!         Rule::when("stock_trend", "down").then("sell"),
//!         Rule::when("stock_trend", "up").then("buy"),
//!     ],
//! )?;
//! let result = engine.evaluate_pairs(&[("stock_trend", 4.0)])?;
//! ```

pub mod engine;
pub mod membership;
pub mod rule;
pub mod universe;
pub mod variable;

pub use engine::{EvaluationResult, InferenceEngine};
pub use membership::{FuzzyValue, Grid, MembershipFunction, Shape};
pub use rule::{Rule, RuleBuilder, Term};
pub use universe::{Points, Universe, UniverseSpec};
pub use variable::{Fuzzified, FuzzifiedInputs, LinguisticVariable, Role};
