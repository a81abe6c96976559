//! The single-position model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Side-aware fractional price move from `entry` to `price`.
    ///
    /// Positive when the move favors the position.
    #[inline]
    pub fn fractional_move(&self, entry: f64, price: f64) -> f64 {
        match self {
            Side::Long => (price - entry) / entry,
            Side::Short => (entry - price) / entry,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

/// An open position. At most one instance is live at any time; the backtest
/// engine owns it exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Direction
    pub side: Side,
    /// Simulated entry fill price (slippage applied)
    pub entry_price: f64,
    /// Entry bar timestamp in milliseconds
    pub entry_time: i64,
    /// Quantity in asset units (margin / entry price, after step rounding)
    pub quantity: f64,
    /// Leverage multiplier
    pub leverage: f64,
    /// Resting stop-loss price
    pub stop_loss: f64,
    /// Resting take-profit price
    pub take_profit: f64,
}

impl Position {
    /// Margin committed to the position (quantity at entry price).
    #[inline]
    pub fn margin(&self) -> f64 {
        self.quantity * self.entry_price
    }

    /// Notional value: quantity x leverage x entry price.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.quantity * self.leverage * self.entry_price
    }

    /// Unrealized P&L against `price`, before any commission.
    ///
    /// Side-aware fractional move x margin x leverage.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.side.fractional_move(self.entry_price, price) * self.margin() * self.leverage
    }
}
