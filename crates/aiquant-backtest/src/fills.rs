//! Fill simulation.
//!
//! Entries and forced closes fill at the bar close adjusted adversely by the
//! slippage fraction. Stop-loss and take-profit exits fill at their exact
//! trigger level with no slippage. Commission is charged on notional value at
//! both ends of a trade, priced at the respective fill.

use aiquant_core::types::{ExitReason, Position, Side, Trade};

/// Simulated entry fill price: the bar close moved against the taker.
pub fn entry_price(close: f64, side: Side, slippage: f64) -> f64 {
    match side {
        Side::Long => close * (1.0 + slippage),
        Side::Short => close * (1.0 - slippage),
    }
}

/// Simulated fill price for closing an open position at market.
pub fn forced_exit_price(close: f64, side: Side, slippage: f64) -> f64 {
    match side {
        Side::Long => close * (1.0 - slippage),
        Side::Short => close * (1.0 + slippage),
    }
}

/// Commission on a notional amount.
pub fn commission(notional: f64, rate: f64) -> f64 {
    notional * rate
}

/// Realize a position into a completed trade.
///
/// Net P&L is the leveraged fractional move applied to margin, minus the
/// exit-side commission. The entry-side commission was already deducted from
/// capital when the position opened; the trade records the sum of both legs.
pub fn close_position(
    position: &Position,
    exit_price: f64,
    exit_time: i64,
    exit_reason: ExitReason,
    commission_rate: f64,
) -> Trade {
    let frac = position.side.fractional_move(position.entry_price, exit_price);
    let gross = frac * position.margin() * position.leverage;

    let entry_notional = position.notional();
    let exit_notional = position.quantity * position.leverage * exit_price;
    let entry_commission = commission(entry_notional, commission_rate);
    let exit_commission = commission(exit_notional, commission_rate);

    let pnl = gross - exit_commission;
    let margin = position.margin();
    let pnl_pct = if margin > 0.0 { pnl / margin * 100.0 } else { 0.0 };

    Trade {
        entry_time: position.entry_time,
        exit_time,
        side: position.side,
        entry_price: position.entry_price,
        exit_price,
        quantity: position.quantity,
        leverage: position.leverage,
        pnl,
        pnl_pct,
        commission: entry_commission + exit_commission,
        exit_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_position() -> Position {
        Position {
            side: Side::Long,
            entry_price: 100.0,
            entry_time: 1_000,
            quantity: 2.0,
            leverage: 3.0,
            stop_loss: 98.0,
            take_profit: 104.0,
        }
    }

    #[test]
    fn test_entry_slippage_is_adverse() {
        assert!((entry_price(100.0, Side::Long, 0.0005) - 100.05).abs() < 1e-9);
        assert!((entry_price(100.0, Side::Short, 0.0005) - 99.95).abs() < 1e-9);
    }

    #[test]
    fn test_forced_exit_slippage_is_adverse() {
        assert!((forced_exit_price(100.0, Side::Long, 0.0005) - 99.95).abs() < 1e-9);
        assert!((forced_exit_price(100.0, Side::Short, 0.0005) - 100.05).abs() < 1e-9);
    }

    #[test]
    fn test_long_take_profit_pnl() {
        let rate = 0.0004;
        let trade = close_position(&long_position(), 104.0, 2_000, ExitReason::TakeProfit, rate);

        // frac 0.04 x margin 200 x leverage 3 = 24 gross
        let exit_commission = 2.0 * 3.0 * 104.0 * rate;
        assert!((trade.pnl - (24.0 - exit_commission)).abs() < 1e-9);
        let entry_commission = 2.0 * 3.0 * 100.0 * rate;
        assert!((trade.commission - (entry_commission + exit_commission)).abs() < 1e-9);
        assert!((trade.pnl_pct - trade.pnl / 200.0 * 100.0).abs() < 1e-9);
        assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
        assert!(trade.is_win());
    }

    #[test]
    fn test_short_profits_on_drop() {
        let position = Position {
            side: Side::Short,
            entry_price: 100.0,
            entry_time: 0,
            quantity: 1.0,
            leverage: 2.0,
            stop_loss: 102.0,
            take_profit: 96.0,
        };
        let trade = close_position(&position, 96.0, 1, ExitReason::TakeProfit, 0.0);
        // frac 0.04 x margin 100 x leverage 2 = 8
        assert!((trade.pnl - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_losing_stop_is_negative() {
        let trade = close_position(&long_position(), 98.0, 2_000, ExitReason::StopLoss, 0.0004);
        assert!(trade.pnl < 0.0);
        assert!(!trade.is_win());
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
    }
}
