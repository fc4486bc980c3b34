//! Report rendering port trait.

use std::collections::BTreeMap;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MtftraderError;
use crate::domain::multi_timeframe::{SignalSummary, TimeframeSignal};
use crate::domain::quality::SignalQuality;
use crate::domain::timeframe::Timeframe;

/// Port for rendering analysis results into a printable document.
pub trait ReportPort {
    fn render_backtests(
        &self,
        results: &BTreeMap<Timeframe, BacktestResult>,
    ) -> Result<String, MtftraderError>;

    fn render_signals(
        &self,
        signals: &BTreeMap<Timeframe, TimeframeSignal>,
        summary: Option<&SignalSummary>,
    ) -> Result<String, MtftraderError>;

    fn render_quality(&self, quality: &SignalQuality) -> Result<String, MtftraderError>;
}
