//! fuzzy-advisor
//!
//! Command-line interface for the fuzzy trading advisor.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};

use fuzzy_advisor::config::{MARKET_INDEX, STOCK_TREND};
use fuzzy_advisor::{AdvisorConfig, LogLevel, OutputFormat, PlotData, Report};

#[derive(Parser)]
#[command(name = "fuzzy-advisor")]
#[command(author = "Fuzzy Advisor Authors")]
#[command(version = "0.1.0")]
#[command(about = "Fuzzy-logic stock advisor - market index and trend in, Sell/Hold/Buy out", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the standard search path)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Market index level
    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    market_index: Option<f64>,

    /// Stock trend
    #[arg(long, value_name = "Y", allow_hyphen_values = true)]
    stock_trend: Option<f64>,

    /// Any input variable of the model
    #[arg(short = 'i', long = "input", value_name = "NAME=VALUE", value_parser = parse_input)]
    inputs: Vec<(String, f64)>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Write membership curves and markers as JSON to this file
    #[arg(long, value_name = "FILE")]
    plot_data: Option<PathBuf>,

    /// Print a commented default configuration and exit
    #[arg(long)]
    generate_config: bool,

    /// Show input readings and every rule's firing strength
    #[arg(long)]
    show_rules: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress warnings)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Score and suggestion lines
    Text,
    /// JSON report
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn parse_input(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn log_level(cli: &Cli, configured: LogLevel) -> LogLevel {
    if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        match configured {
            LogLevel::Debug => LogLevel::Debug,
            _ => LogLevel::Verbose,
        }
    } else {
        configured
    }
}

fn init_logging(level: LogLevel) {
    if let Some(max) = level.tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(max)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        print!("{}", AdvisorConfig::default_config_content());
        return Ok(());
    }

    let (mut config, source) = match &cli.config {
        Some(path) => {
            let config = AdvisorConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            (config, Some(path.clone()))
        }
        None => AdvisorConfig::discover().context("Failed to load configuration")?,
    };
    let rejected = config.apply_env_overrides();

    init_logging(log_level(&cli, config.general.log_level));

    match &source {
        Some(path) => info!(path = %path.display(), "configuration loaded"),
        None => info!("no configuration file found, using defaults"),
    }
    for key in rejected {
        warn!(key, "ignoring unparsable environment override");
    }

    if let Some(format) = cli.format {
        config.general.format = format.into();
    }

    let mut inputs = config.inputs.clone();
    if let Some(value) = cli.market_index {
        inputs.insert(MARKET_INDEX.to_string(), value);
    }
    if let Some(value) = cli.stock_trend {
        inputs.insert(STOCK_TREND.to_string(), value);
    }
    for (name, value) in &cli.inputs {
        inputs.insert(name.clone(), *value);
    }

    let engine = config.model.build().context("Invalid fuzzy model")?;
    info!(
        variables = engine.antecedents().len() + 1,
        rules = engine.rules().len(),
        "model loaded"
    );
    debug!(inputs = ?inputs, "evaluating");

    let values: HashMap<String, f64> = inputs.iter().map(|(k, v)| (k.clone(), *v)).collect();
    let result = match engine.evaluate(&values) {
        Ok(result) => Some(result),
        Err(e) if e.is_no_rule_fired() => None,
        Err(e) => return Err(e).context("Evaluation failed"),
    };

    let report = match &result {
        Some(result) => Report::from_result(&engine, &inputs, result),
        None => Report::no_rule_fired(&engine, &inputs),
    };

    match config.general.format {
        OutputFormat::Text => print!("{}", report.render_text(cli.show_rules)),
        OutputFormat::Json => println!("{}", report.to_json().context("Failed to render report")?),
    }

    if let Some(path) = &cli.plot_data {
        let plot = PlotData::new(&engine, &inputs, result.as_ref());
        let json = plot.to_json().context("Failed to render plot data")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write plot data: {}", path.display()))?;
        info!(path = %path.display(), "plot data written");
    }

    Ok(())
}
