//! Structured Error Handling for fuzzy-advisor
//!
//! Provides a unified error type with:
//! - Error codes for programmatic handling
//! - Structured error responses (JSON-friendly)
//! - Context preservation through error chains
//!
//! # Error Categories
//!
//! - Inference errors (2xxx) - evaluation produced no usable output
//! - Validation errors (5xxx) - bad evaluation input
//! - Configuration errors (7xxx) - malformed universes, shapes, variables or rules
//! - Internal errors (9xxx)
//!
//! Configuration errors are raised while building an engine and are fatal.
//! `NoRuleFired` is reported per evaluation and leaves the engine usable.
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_advisor::error::{AdvisorError, ErrorCode};
//!
//! match engine.evaluate(&inputs) {
//!     Ok(result) => println!("{:.2}", result.crisp_output),
//!     Err(e) if e.is_no_rule_fired() => println!("no applicable rule"),
//!     Err(e) => return Err(e),
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Inference errors (2xxx)
    /// Aggregate output set has zero mass
    NoRuleFired = 2001,

    // Validation errors (5xxx)
    /// An antecedent variable has no input value
    MissingInput = 5001,

    // Config errors (7xxx)
    /// Generic config error
    ConfigError = 7000,
    /// Config file not found
    ConfigNotFound = 7001,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,
    /// Universe bounds or step are malformed
    InvalidUniverse = 7010,
    /// Membership shape parameters are malformed
    InvalidShape = 7011,
    /// Label defined twice within one variable
    DuplicateLabel = 7012,
    /// Variable defined twice within one engine
    DuplicateVariable = 7013,
    /// Variable defines no labels
    EmptyVariable = 7014,
    /// Variable used in the wrong role
    RoleMismatch = 7015,
    /// Rule base is empty or a rule has no antecedent
    EmptyRule = 7016,
    /// Rule references a variable that does not exist
    UnknownVariable = 7017,
    /// Rule references a label that does not exist
    UnknownLabel = 7018,

    // Internal errors (9xxx)
    /// Unexpected state
    UnexpectedState = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::NoRuleFired => "No applicable rule",

            ErrorCode::MissingInput => "Missing input value",

            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ConfigNotFound => "Configuration file not found",
            ErrorCode::InvalidConfigSyntax => "Invalid configuration syntax",
            ErrorCode::InvalidUniverse => "Invalid universe",
            ErrorCode::InvalidShape => "Invalid membership shape",
            ErrorCode::DuplicateLabel => "Duplicate label",
            ErrorCode::DuplicateVariable => "Duplicate variable",
            ErrorCode::EmptyVariable => "Variable has no labels",
            ErrorCode::RoleMismatch => "Variable role mismatch",
            ErrorCode::EmptyRule => "Empty rule",
            ErrorCode::UnknownVariable => "Unknown variable",
            ErrorCode::UnknownLabel => "Unknown label",

            ErrorCode::UnexpectedState => "Unexpected state",
        }
    }

    /// Whether this code belongs to the configuration category (7xxx)
    pub fn is_configuration(&self) -> bool {
        (7000..8000).contains(&self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// Source location (file:line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Stack of error causes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for fuzzy-advisor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl AdvisorError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    // ========================================================================
    // Factory methods
    // ========================================================================

    /// Create a generic configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Create a malformed universe error
    pub fn invalid_universe(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidUniverse, message)
    }

    /// Create a malformed shape error for `label`
    pub fn invalid_shape(label: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidShape, message).with_context("label", label)
    }

    /// Create a duplicate label error
    pub fn duplicate_label(variable: &str, label: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateLabel,
            format!("Label '{}' is defined more than once in variable '{}'", label, variable),
        )
        .with_context("variable", variable)
        .with_context("label", label)
    }

    /// Create a duplicate variable error
    pub fn duplicate_variable(name: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateVariable,
            format!("Variable '{}' is defined more than once", name),
        )
        .with_context("variable", name)
    }

    /// Create an unknown variable error
    pub fn unknown_variable(rule: &str, variable: &str) -> Self {
        Self::new(
            ErrorCode::UnknownVariable,
            format!("{} references unknown variable '{}'", rule, variable),
        )
        .with_context("rule", rule)
        .with_context("variable", variable)
    }

    /// Create an unknown label error
    pub fn unknown_label(rule: &str, variable: &str, label: &str) -> Self {
        Self::new(
            ErrorCode::UnknownLabel,
            format!("{} references unknown label '{}' of variable '{}'", rule, label, variable),
        )
        .with_context("rule", rule)
        .with_context("variable", variable)
        .with_context("label", label)
    }

    /// Create a no-rule-fired error
    pub fn no_rule_fired() -> Self {
        Self::new(
            ErrorCode::NoRuleFired,
            "No rule fired for the given inputs; the aggregate output set is empty",
        )
        .with_hint("Check that the rule base covers this input combination")
    }

    /// Create a missing input error
    pub fn missing_input(variable: &str) -> Self {
        Self::new(
            ErrorCode::MissingInput,
            format!("No input value supplied for variable '{}'", variable),
        )
        .with_context("variable", variable)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add a cause to the error chain
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.causes.push(cause.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Construction-time configuration failure
    pub fn is_configuration(&self) -> bool {
        self.code.is_configuration()
    }

    /// Evaluation found no applicable rule
    pub fn is_no_rule_fired(&self) -> bool {
        self.code == ErrorCode::NoRuleFired
    }

    /// Look up a context field
    pub fn context_field(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|c| c.fields.get(key))
            .map(String::as_str)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL_ERROR","message":"{}"}}"#, self.message)
        })
    }
}

impl fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
            if !ctx.causes.is_empty() {
                write!(f, "\nCaused by:")?;
                for cause in &ctx.causes {
                    write!(f, "\n  - {}", cause)?;
                }
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for AdvisorError {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<toml::de::Error> for AdvisorError {
    fn from(err: toml::de::Error) -> Self {
        AdvisorError::config(err.to_string()).with_code(ErrorCode::InvalidConfigSyntax)
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        AdvisorError::config(err.to_string())
            .with_code(ErrorCode::InvalidConfigSyntax)
            .with_context("format", "JSON")
    }
}

/// A Result type using AdvisorError
pub type AdvisorResult<T> = Result<T, AdvisorError>;

// ============================================================================
// Macros for convenient error creation
// ============================================================================

/// Create an AdvisorError with context from the current location
#[macro_export]
macro_rules! advisor_error {
    ($code:expr, $msg:expr) => {
        $crate::error::AdvisorError::new($code, $msg)
            .at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::AdvisorError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

/// Bail out early with an error
#[macro_export]
macro_rules! advisor_bail {
    ($code:expr, $msg:expr) => {
        return Err($crate::advisor_error!($code, $msg))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::advisor_error!($code, $fmt, $($arg)*))
    };
}

/// Ensure a condition holds, or return an error
#[macro_export]
macro_rules! advisor_ensure {
    ($cond:expr, $code:expr, $msg:expr) => {
        if !$cond {
            $crate::advisor_bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::advisor_bail!($code, $fmt, $($arg)*);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================
