//! Timeframes and their indicator/risk profiles.
//!
//! | Timeframe | Short MA | Long MA | Risk factor |
//! |-----------|----------|---------|-------------|
//! | scalping  | 3        | 10      | 1.0         |
//! | 1h        | 5        | 20      | 1.5         |
//! | 4h        | 7        | 30      | 2.0         |
//! | daily     | 10       | 50      | 3.0         |
//! | weekly    | 20       | 100     | 5.0         |
//!
//! Names outside this table resolve to [`Timeframe::Other`], which carries
//! the fallback profile `(7, 30, 1.0)`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "scalping")]
    Scalping,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHour,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    /// Any unrecognised name. The requested name is not kept: reports label
    /// these runs "other", and the CLI logs the original name when it
    /// falls back.
    #[serde(rename = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeframeProfile {
    pub short_period: usize,
    pub long_period: usize,
    pub risk_factor: f64,
}

pub const DEFAULT_PROFILE: TimeframeProfile = TimeframeProfile {
    short_period: 7,
    long_period: 30,
    risk_factor: 1.0,
};

impl Timeframe {
    /// Every profiled timeframe, shortest first.
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Scalping,
        Timeframe::OneHour,
        Timeframe::FourHour,
        Timeframe::Daily,
        Timeframe::Weekly,
    ];

    /// Resolve a timeframe name. Unknown names map to [`Timeframe::Other`].
    pub fn from_name(name: &str) -> Self {
        Self::known(name).unwrap_or(Timeframe::Other)
    }

    /// Resolve a timeframe name, returning `None` for names outside the table.
    pub fn known(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "scalping" => Some(Timeframe::Scalping),
            "1h" => Some(Timeframe::OneHour),
            "4h" => Some(Timeframe::FourHour),
            "daily" => Some(Timeframe::Daily),
            "weekly" => Some(Timeframe::Weekly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Scalping => "scalping",
            Timeframe::OneHour => "1h",
            Timeframe::FourHour => "4h",
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Other => "other",
        }
    }

    pub fn profile(&self) -> TimeframeProfile {
        let (short_period, long_period, risk_factor) = match self {
            Timeframe::Scalping => (3, 10, 1.0),
            Timeframe::OneHour => (5, 20, 1.5),
            Timeframe::FourHour => (7, 30, 2.0),
            Timeframe::Daily => (10, 50, 3.0),
            Timeframe::Weekly => (20, 100, 5.0),
            Timeframe::Other => return DEFAULT_PROFILE,
        };
        TimeframeProfile {
            short_period,
            long_period,
            risk_factor,
        }
    }

    /// Trend-following timeframes hold positions without a fixed profit target.
    pub fn has_open_target(&self) -> bool {
        matches!(self, Timeframe::Daily | Timeframe::Weekly)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
