//! CLI definition and dispatch.
//!
//! Each command resolves its adapters, hands them to a `*_pipeline` function
//! that returns the rendered report, then prints or writes it. The pipelines
//! take port trait objects so they can be driven by mocks in tests.

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::json_weight_adapter::JsonWeightAdapter;
use crate::adapters::markdown_report_adapter::MarkdownReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{build_backtest_config, build_data_config, DataConfig};
use crate::domain::error::MtftraderError;
use crate::domain::multi_timeframe::{
    multi_timeframe_signals, run_multi_timeframe_detailed, summarize,
};
use crate::domain::quality::analyze_signal_quality;
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use crate::ports::weight_port::WeightPort;

#[derive(Parser, Debug)]
#[command(
    name = "mtftrader",
    about = "Multi-timeframe signal generation and walk-forward backtesting"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by the analysis commands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Price CSV with close (or price) and volume columns
    #[arg(short, long)]
    pub data: PathBuf,
    /// INI config with [backtest] and [data] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Weight JSON file, overriding [data] weights_path
    #[arg(short, long)]
    pub weights: Option<PathBuf>,
    /// Drop bars dated before this day (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Drop bars dated after this day (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Emit JSON instead of markdown
    #[arg(long)]
    pub json: bool,
    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk-forward backtest over one or every configured timeframe
    Backtest {
        #[command(flatten)]
        input: InputArgs,
        /// Run a single timeframe instead of the configured set
        #[arg(short, long)]
        timeframe: Option<String>,
        /// Append each timeframe's trade log to the report
        #[arg(long)]
        trades: bool,
    },
    /// Current signal on every configured timeframe, with a summary
    Signals {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Signal quality analysis for one timeframe
    Quality {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long, default_value = "daily")]
        timeframe: String,
    },
    /// Validate a configuration file and print the resolved values
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Installs the stderr subscriber. Safe to call more than once.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            input,
            timeframe,
            trades,
        } => run_backtest_command(&input, timeframe.as_deref(), trades),
        Command::Signals { input } => run_signals_command(&input),
        Command::Quality { input, timeframe } => run_quality_command(&input, &timeframe),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Settings resolved from the optional config file and CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub backtest: BacktestConfig,
    pub data: DataConfig,
}

pub fn resolve_settings(input: &InputArgs) -> Result<ResolvedSettings, MtftraderError> {
    let (backtest, mut data) = match &input.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            let adapter = FileConfigAdapter::from_file(path)?;
            (build_backtest_config(&adapter)?, build_data_config(&adapter)?)
        }
        None => (BacktestConfig::default(), DataConfig::default()),
    };
    if let Some(weights) = &input.weights {
        data.weights_path = weights.clone();
    }
    Ok(ResolvedSettings { backtest, data })
}

/// Resolves a timeframe name, falling back to the default profile for
/// unrecognised names.
pub fn parse_timeframe(name: &str) -> Timeframe {
    let timeframe = Timeframe::from_name(name);
    if timeframe == Timeframe::Other {
        warn!(name, "unknown timeframe, using default profile");
    }
    timeframe
}

pub fn backtest_pipeline(
    data_port: &dyn DataPort,
    weight_port: &dyn WeightPort,
    report_port: &dyn ReportPort,
    config: &BacktestConfig,
    timeframe: Option<Timeframe>,
    range: (Option<NaiveDate>, Option<NaiveDate>),
) -> Result<String, MtftraderError> {
    let series = data_port.fetch_range(range.0, range.1)?;
    let weights = weight_port.load_weights()?;
    info!(bars = series.len(), weights = weights.len(), "running backtest");

    let results: BTreeMap<Timeframe, BacktestResult> = match timeframe {
        Some(tf) => BTreeMap::from([(tf, run_backtest(&series, tf, &weights, config))]),
        None => run_multi_timeframe_detailed(&series, &weights, config),
    };
    report_port.render_backtests(&results)
}

pub fn signals_pipeline(
    data_port: &dyn DataPort,
    weight_port: &dyn WeightPort,
    report_port: &dyn ReportPort,
    config: &BacktestConfig,
    range: (Option<NaiveDate>, Option<NaiveDate>),
) -> Result<String, MtftraderError> {
    let series = data_port.fetch_range(range.0, range.1)?;
    let weights = weight_port.load_weights()?;

    let signals = multi_timeframe_signals(
        series.closes(),
        series.volumes(),
        &config.timeframes,
        &weights,
        config.risk_percent,
    );
    let summary = summarize(&signals);
    report_port.render_signals(&signals, summary.as_ref())
}

pub fn quality_pipeline(
    data_port: &dyn DataPort,
    weight_port: &dyn WeightPort,
    report_port: &dyn ReportPort,
    timeframe: Timeframe,
    range: (Option<NaiveDate>, Option<NaiveDate>),
) -> Result<String, MtftraderError> {
    let series = data_port.fetch_range(range.0, range.1)?;
    let weights = weight_port.load_weights()?;
    let quality = analyze_signal_quality(series.closes(), series.volumes(), timeframe, &weights)?;
    report_port.render_quality(&quality)
}

fn run_backtest_command(
    input: &InputArgs,
    timeframe: Option<&str>,
    trades: bool,
) -> Result<(), MtftraderError> {
    let settings = resolve_settings(input)?;
    let data_port = CsvAdapter::new(input.data.clone());
    let weight_port = JsonWeightAdapter::from_config(&settings.data);
    let markdown = MarkdownReportAdapter::new().with_trades(trades);
    let report_port: &dyn ReportPort = if input.json { &JsonReportAdapter } else { &markdown };

    let rendered = backtest_pipeline(
        &data_port,
        &weight_port,
        report_port,
        &settings.backtest,
        timeframe.map(parse_timeframe),
        (input.start, input.end),
    )?;
    emit(&rendered, input.output.as_deref())
}

fn run_signals_command(input: &InputArgs) -> Result<(), MtftraderError> {
    let settings = resolve_settings(input)?;
    let data_port = CsvAdapter::new(input.data.clone());
    let weight_port = JsonWeightAdapter::from_config(&settings.data);
    let markdown = MarkdownReportAdapter::new();
    let report_port: &dyn ReportPort = if input.json { &JsonReportAdapter } else { &markdown };

    let rendered = signals_pipeline(
        &data_port,
        &weight_port,
        report_port,
        &settings.backtest,
        (input.start, input.end),
    )?;
    emit(&rendered, input.output.as_deref())
}

fn run_quality_command(input: &InputArgs, timeframe: &str) -> Result<(), MtftraderError> {
    let settings = resolve_settings(input)?;
    let data_port = CsvAdapter::new(input.data.clone());
    let weight_port = JsonWeightAdapter::from_config(&settings.data);
    let markdown = MarkdownReportAdapter::new();
    let report_port: &dyn ReportPort = if input.json { &JsonReportAdapter } else { &markdown };

    let rendered = quality_pipeline(
        &data_port,
        &weight_port,
        report_port,
        parse_timeframe(timeframe),
        (input.start, input.end),
    )?;
    emit(&rendered, input.output.as_deref())
}

fn run_validate(config_path: &Path) -> Result<(), MtftraderError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let backtest = build_backtest_config(&adapter)?;
    let data = build_data_config(&adapter)?;

    let timeframes: Vec<&str> = backtest.timeframes.iter().map(|tf| tf.as_str()).collect();
    println!("Config OK: {}", config_path.display());
    println!("  warmup_bars      = {}", backtest.warmup_bars);
    println!("  risk_percent     = {}", backtest.risk_percent);
    println!("  entry_confidence = {}", backtest.entry_confidence);
    println!("  exit_confidence  = {}", backtest.exit_confidence);
    println!("  momentum_period  = {}", backtest.momentum_period);
    println!("  timeframes       = {}", timeframes.join(", "));
    println!("  weights_path     = {}", data.weights_path.display());
    println!("  weights_field    = {}", data.weights_field);
    Ok(())
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<(), MtftraderError> {
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
