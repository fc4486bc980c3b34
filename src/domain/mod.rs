//! Core domain types and logic.

pub mod price_series;
pub mod timeframe;
pub mod weights;
pub mod indicator;
pub mod signal;
pub mod risk;
pub mod position;
pub mod backtest;
pub mod metrics;
pub mod multi_timeframe;
pub mod quality;
pub mod config_validation;
pub mod error;
