//! Configuration validation.
//!
//! Reads the `[backtest]` and `[data]` sections into typed configs, rejecting
//! out-of-range values. Missing keys take the documented defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::MtftraderError;
use crate::domain::timeframe::Timeframe;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_WEIGHTS_PATH: &str = "data/trained_skill_weights.json";
pub const DEFAULT_WEIGHTS_FIELD: &str = "weights";

/// Where the weight mapping is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub weights_path: PathBuf,
    /// Top-level JSON field holding the name → weight object.
    pub weights_field: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            weights_path: PathBuf::from(DEFAULT_WEIGHTS_PATH),
            weights_field: DEFAULT_WEIGHTS_FIELD.to_string(),
        }
    }
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, MtftraderError> {
    let defaults = BacktestConfig::default();

    let warmup_bars = config.get_int("backtest", "warmup_bars", defaults.warmup_bars as i64);
    if warmup_bars < 1 {
        return Err(invalid("warmup_bars", "warmup_bars must be at least 1"));
    }

    let risk_percent = config.get_double("backtest", "risk_percent", defaults.risk_percent);
    if !(risk_percent > 0.0 && risk_percent < 1.0) {
        return Err(invalid("risk_percent", "risk_percent must be between 0 and 1"));
    }

    let entry_confidence =
        config.get_double("backtest", "entry_confidence", defaults.entry_confidence);
    validate_confidence("entry_confidence", entry_confidence)?;

    let exit_confidence =
        config.get_double("backtest", "exit_confidence", defaults.exit_confidence);
    validate_confidence("exit_confidence", exit_confidence)?;

    let momentum_period =
        config.get_int("backtest", "momentum_period", defaults.momentum_period as i64);
    if momentum_period < 1 {
        return Err(invalid("momentum_period", "momentum_period must be at least 1"));
    }

    let timeframes = match config.get_list("backtest", "timeframes") {
        Some(names) => parse_timeframes(&names)?,
        None => defaults.timeframes,
    };

    Ok(BacktestConfig {
        warmup_bars: warmup_bars as usize,
        risk_percent,
        entry_confidence,
        exit_confidence,
        momentum_period: momentum_period as usize,
        timeframes,
    })
}

pub fn build_data_config(config: &dyn ConfigPort) -> Result<DataConfig, MtftraderError> {
    let defaults = DataConfig::default();

    let weights_path = match config.get_string("data", "weights_path") {
        Some(p) if p.trim().is_empty() => {
            return Err(MtftraderError::ConfigInvalid {
                section: "data".to_string(),
                key: "weights_path".to_string(),
                reason: "weights_path must not be empty".to_string(),
            });
        }
        Some(p) => PathBuf::from(p.trim()),
        None => defaults.weights_path,
    };

    let weights_field = match config.get_string("data", "weights_field") {
        Some(f) if f.trim().is_empty() => {
            return Err(MtftraderError::ConfigInvalid {
                section: "data".to_string(),
                key: "weights_field".to_string(),
                reason: "weights_field must not be empty".to_string(),
            });
        }
        Some(f) => f.trim().to_string(),
        None => defaults.weights_field,
    };

    Ok(DataConfig {
        weights_path,
        weights_field,
    })
}

fn validate_confidence(key: &str, value: f64) -> Result<(), MtftraderError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(key, &format!("{} must be between 0 and 100", key)));
    }
    Ok(())
}

fn parse_timeframes(names: &[String]) -> Result<Vec<Timeframe>, MtftraderError> {
    if names.is_empty() {
        return Err(invalid("timeframes", "at least one timeframe is required"));
    }

    let mut seen = HashSet::new();
    let mut timeframes = Vec::with_capacity(names.len());
    for name in names {
        let tf = Timeframe::known(name)
            .ok_or_else(|| invalid("timeframes", &format!("unknown timeframe: {}", name)))?;
        if !seen.insert(tf) {
            return Err(invalid("timeframes", &format!("duplicate timeframe: {}", tf)));
        }
        timeframes.push(tf);
    }
    Ok(timeframes)
}

fn invalid(key: &str, reason: &str) -> MtftraderError {
    MtftraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
