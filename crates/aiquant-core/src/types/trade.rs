//! Closed trade records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Side;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    /// The bar touched or breached the stop price
    StopLoss,
    /// The bar touched or exceeded the take-profit price
    TakeProfit,
    /// End of the bar series was reached while still open
    ForcedClose,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "STOP_LOSS"),
            ExitReason::TakeProfit => write!(f, "TAKE_PROFIT"),
            ExitReason::ForcedClose => write!(f, "FORCED_CLOSE"),
        }
    }
}

/// Immutable record created when a position closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Entry bar timestamp in milliseconds
    pub entry_time: i64,
    /// Exit bar timestamp in milliseconds; always > entry_time
    pub exit_time: i64,
    /// Direction
    pub side: Side,
    /// Simulated entry fill price
    pub entry_price: f64,
    /// Simulated exit fill price
    pub exit_price: f64,
    /// Quantity in asset units
    pub quantity: f64,
    /// Leverage multiplier
    pub leverage: f64,
    /// Realized P&L net of exit commission
    pub pnl: f64,
    /// P&L as a percentage of committed margin
    pub pnl_pct: f64,
    /// Total commission paid (entry + exit)
    pub commission: f64,
    /// Close trigger
    pub exit_reason: ExitReason,
}

impl Trade {
    /// Check if the trade was profitable.
    #[inline]
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
