//! Open position and closed trade records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A long position opened by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: Option<f64>,
    pub entry_index: usize,
    pub confidence: f64,
}

impl Position {
    pub fn should_stop_loss(&self, price: f64) -> bool {
        price <= self.stop_loss
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        self.take_profit.is_some_and(|target| price >= target)
    }

    pub fn return_at(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price
    }

    pub fn close(self, exit_price: f64, exit_index: usize, reason: ExitReason) -> Trade {
        Trade {
            entry_price: self.entry_price,
            exit_price,
            entry_index: self.entry_index,
            exit_index,
            pnl_ratio: self.return_at(exit_price),
            reason,
            confidence: self.confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    SignalExit,
    EndOfPeriod,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::SignalExit => "signal_exit",
            ExitReason::EndOfPeriod => "end_of_period",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_index: usize,
    pub exit_index: usize,
    pub pnl_ratio: f64,
    pub reason: ExitReason,
    /// Overall confidence when the position was opened.
    pub confidence: f64,
}

/// At most one position exists at a time; the variant makes a second open
/// position unrepresentable.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PositionState {
    #[default]
    Flat,
    Open(Position),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            PositionState::Open(position) => Some(position),
            PositionState::Flat => None,
        }
    }

    /// Opens `position` if flat. Returns `false` and leaves the state alone
    /// when a position is already open.
    pub fn open(&mut self, position: Position) -> bool {
        if !self.is_flat() {
            return false;
        }
        *self = PositionState::Open(position);
        true
    }

    /// Closes the open position, if any, returning the realized trade.
    pub fn close(
        &mut self,
        exit_price: f64,
        exit_index: usize,
        reason: ExitReason,
    ) -> Option<Trade> {
        match std::mem::take(self) {
            PositionState::Open(position) => Some(position.close(exit_price, exit_index, reason)),
            PositionState::Flat => None,
        }
    }
}
