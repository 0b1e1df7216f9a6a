//! Configuration System for fuzzy-advisor
//!
//! Provides a configuration system supporting:
//! - TOML configuration files
//! - Environment variable overrides
//! - The fuzzy model itself (variables, shapes, rules)
//! - Multiple config file locations
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./advisor.toml` - Project-local configuration
//! 2. `~/.config/fuzzy-advisor/config.toml` - User configuration (XDG)
//! 3. `~/.fuzzy-advisor/config.toml` - User configuration (legacy)
//! 4. `/etc/fuzzy-advisor/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `ADVISOR_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `ADVISOR_FORMAT` - Output format (text, json)
//! - `ADVISOR_MARKET_INDEX` - Default market index input
//! - `ADVISOR_STOCK_TREND` - Default stock trend input
//!
//! # Example Configuration
//!
//! ```toml
//! [general]
//! log_level = "normal"
//! format = "text"
//!
//! [inputs]
//! market_index = 4500.0
//! stock_trend = 5.0
//!
//! [[model.variables]]
//! name = "stock_trend"
//! role = "antecedent"
//! universe = { min = -10.0, max = 10.0, step = 1.0 }
//! terms = [
//!     { label = "down", shape = { triangular = [-10.0, -10.0, 0.0] } },
//!     { label = "up", shape = { triangular = [0.0, 10.0, 10.0] } },
//! ]
//! ```

mod model;

pub use model::{ModelConfig, TermConfig, VariableConfig, DECISION, MARKET_INDEX, STOCK_TREND};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, ErrorCode};

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Default crisp inputs, keyed by variable name
    pub inputs: IndexMap<String, f64>,
    /// The fuzzy model
    pub model: ModelConfig,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        let mut inputs = IndexMap::new();
        inputs.insert(MARKET_INDEX.to_string(), 4500.0);
        inputs.insert(STOCK_TREND.to_string(), 5.0);

        Self {
            general: GeneralConfig::default(),
            inputs,
            model: ModelConfig::reference(),
        }
    }
}

/// General configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging level
    pub log_level: LogLevel,
    /// Output format
    pub format: OutputFormat,
}

// ============================================================================
// Enums
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Most detailed tracing level to emit; `None` silences everything
    pub fn tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Quiet => None,
            LogLevel::Normal => Some(tracing::Level::WARN),
            LogLevel::Verbose => Some(tracing::Level::INFO),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
        }
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl AdvisorConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from default locations, then apply environment
    /// variable overrides
    pub fn load() -> Result<Self, ConfigError> {
        let (mut config, _) = Self::discover()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the first config file found on the search path, without
    /// environment overrides; also returns the file used, if any
    pub fn discover() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in Self::config_paths() {
            if path.exists() {
                let config = Self::load_from_file(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<string>"), e.to_string()))
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./advisor.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fuzzy-advisor").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".fuzzy-advisor").join("config.toml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/fuzzy-advisor/config.toml"));

        paths
    }

    /// Apply environment variable overrides; returns the keys whose values
    /// could not be parsed
    pub fn apply_env_overrides(&mut self) -> Vec<&'static str> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any `ADVISOR_*` lookup
    ///
    /// Unparsable values leave the setting untouched and their key is
    /// returned, so the caller can report them once logging is up.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();

        if let Some(value) = lookup("ADVISOR_LOG_LEVEL") {
            match LogLevel::from_str(&value) {
                Some(level) => self.general.log_level = level,
                None => rejected.push("ADVISOR_LOG_LEVEL"),
            }
        }

        if let Some(value) = lookup("ADVISOR_FORMAT") {
            match OutputFormat::from_str(&value) {
                Some(format) => self.general.format = format,
                None => rejected.push("ADVISOR_FORMAT"),
            }
        }

        for (key, variable) in [
            ("ADVISOR_MARKET_INDEX", MARKET_INDEX),
            ("ADVISOR_STOCK_TREND", STOCK_TREND),
        ] {
            match lookup(key).map(|v| v.trim().parse::<f64>()) {
                Some(Ok(value)) => {
                    self.inputs.insert(variable.to_string(), value);
                }
                Some(Err(_)) => rejected.push(key),
                None => {}
            }
        }

        rejected
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# fuzzy-advisor configuration

[general]
# Logging level: quiet, normal, verbose, debug
log_level = "normal"
# Output format: text, json
format = "text"

# Crisp inputs used when none are given on the command line
[inputs]
market_index = 4500.0
stock_trend = 5.0

# Shapes: triangular = [a, b, c], trapezoidal = [a, b, c, d], gaussian = [mean, sigma]

[[model.variables]]
name = "market_index"
role = "antecedent"
universe = { min = 3000.0, max = 5000.0, step = 1.0 }
terms = [
    { label = "low", shape = { triangular = [3000.0, 3000.0, 4000.0] } },
    { label = "medium", shape = { triangular = [3500.0, 4000.0, 4500.0] } },
    { label = "high", shape = { triangular = [4000.0, 5000.0, 5000.0] } },
]

[[model.variables]]
name = "stock_trend"
role = "antecedent"
universe = { min = -10.0, max = 10.0, step = 1.0 }
terms = [
    { label = "down", shape = { triangular = [-10.0, -10.0, 0.0] } },
    { label = "steady", shape = { triangular = [-5.0, 0.0, 5.0] } },
    { label = "up", shape = { triangular = [0.0, 10.0, 10.0] } },
]

# Decision score: 0 = sell, 50 = hold, 100 = buy
[[model.variables]]
name = "decision"
role = "consequent"
universe = { min = 0.0, max = 100.0, step = 1.0 }
terms = [
    { label = "sell", shape = { triangular = [0.0, 0.0, 50.0] } },
    { label = "hold", shape = { triangular = [25.0, 50.0, 75.0] } },
    { label = "buy", shape = { triangular = [50.0, 100.0, 100.0] } },
]

[[model.rules]]
when = [{ variable = "market_index", label = "low" }, { variable = "stock_trend", label = "down" }]
then = "sell"

[[model.rules]]
when = [{ variable = "market_index", label = "medium" }, { variable = "stock_trend", label = "steady" }]
then = "hold"

[[model.rules]]
when = [{ variable = "market_index", label = "high" }, { variable = "stock_trend", label = "up" }]
then = "buy"

[[model.rules]]
when = [{ variable = "market_index", label = "high" }, { variable = "stock_trend", label = "down" }]
then = "sell"

[[model.rules]]
when = [{ variable = "market_index", label = "medium" }, { variable = "stock_trend", label = "up" }]
then = "buy"

[[model.rules]]
when = [{ variable = "market_index", label = "low" }, { variable = "stock_trend", label = "steady" }]
then = "hold"
"#
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {}", .0.display(), .1)]
    Io(PathBuf, String),

    #[error("Parse error in {}: {}", .0.display(), .1)]
    Parse(PathBuf, String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<ConfigError> for AdvisorError {
    fn from(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::Io(..) => ErrorCode::ConfigNotFound,
            ConfigError::Parse(..) => ErrorCode::InvalidConfigSyntax,
            ConfigError::Serialize(..) => ErrorCode::ConfigError,
        };
        AdvisorError::new(code, err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
