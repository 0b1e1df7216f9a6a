//! fuzzy-advisor - Mamdani fuzzy inference for trading decisions
//!
//! Turns two crisp market readings (a market index level and a stock trend)
//! into a 0..=100 decision score and a Sell / Hold / Buy recommendation.
//!
//! # Architecture
//!
//! - [`fuzzy`] - Universes, membership functions, linguistic variables, rules
//!   and the [`InferenceEngine`] (min conjunction, max aggregation, centroid)
//! - [`decision`] - Threshold mapping from score to [`Recommendation`]
//! - [`config`] - TOML configuration, including the model definition
//! - [`report`] - Text/JSON presentation and plot data export
//! - [`error`] - Structured errors with numeric codes
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_advisor::{DecisionMapper, ModelConfig};
//!
//! let engine = ModelConfig::reference().build()?;
//! let result = engine.evaluate_pairs(&[("market_index", 4500.0), ("stock_trend", 5.0)])?;
//! println!("Decision Score: {:.2}", result.crisp_output);
//! println!("{}", DecisionMapper::recommend(result.crisp_output).suggestion());
//! ```

pub mod config;
pub mod decision;
pub mod error;
pub mod fuzzy;
pub mod report;

// Re-export inference types
pub use fuzzy::{
    EvaluationResult, FuzzyValue, InferenceEngine, LinguisticVariable, MembershipFunction, Role,
    Rule, Shape, Term, Universe,
};

// Re-export decision types
pub use decision::{DecisionMapper, Recommendation};

// Re-export configuration types
pub use config::{
    AdvisorConfig, ConfigError, GeneralConfig, LogLevel, ModelConfig, OutputFormat, TermConfig,
    VariableConfig,
};

// Re-export presentation types
pub use report::{Outcome, PlotData, Report};

// Re-export error types
pub use error::{AdvisorError, AdvisorResult, ErrorCode, ErrorContext};
