//! Equity tracking and run statistics.

use aiquant_core::types::Trade;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Annualization factor base for ratio calculations (trading days).
const TRADING_DAYS: f64 = 252.0;

/// One point on the equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: i64,
    pub equity: f64,
}

/// One point on the drawdown curve, as percent below the running peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub timestamp: i64,
    pub drawdown_pct: f64,
}

/// Tracks mark-to-market equity bar by bar.
///
/// Seeded with one point at the initial capital so the curves always hold
/// one more point than the number of processed bars.
#[derive(Debug, Clone)]
pub struct EquityTracker {
    equity_curve: Vec<EquityPoint>,
    drawdown_curve: Vec<DrawdownPoint>,
    peak: f64,
    max_drawdown: f64,
    max_drawdown_pct: f64,
}

impl EquityTracker {
    pub fn new(initial_capital: f64, seed_timestamp: i64) -> Self {
        Self {
            equity_curve: vec![EquityPoint {
                timestamp: seed_timestamp,
                equity: initial_capital,
            }],
            drawdown_curve: vec![DrawdownPoint {
                timestamp: seed_timestamp,
                drawdown_pct: 0.0,
            }],
            peak: initial_capital,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
        }
    }

    /// Record equity at a bar close, updating peak and drawdown.
    pub fn record(&mut self, timestamp: i64, equity: f64) {
        if equity > self.peak {
            self.peak = equity;
        }

        let drawdown = self.peak - equity;
        let drawdown_pct = if self.peak > 0.0 {
            drawdown / self.peak * 100.0
        } else {
            0.0
        };
        // Tracked independently: a small percent decline from a high peak
        // can be the largest absolute decline, and vice versa.
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
        if drawdown_pct > self.max_drawdown_pct {
            self.max_drawdown_pct = drawdown_pct;
        }

        self.equity_curve.push(EquityPoint { timestamp, equity });
        self.drawdown_curve.push(DrawdownPoint {
            timestamp,
            drawdown_pct,
        });
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    pub fn drawdown_curve(&self) -> &[DrawdownPoint] {
        &self.drawdown_curve
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn max_drawdown_pct(&self) -> f64 {
        self.max_drawdown_pct
    }

    pub fn into_curves(self) -> (Vec<EquityPoint>, Vec<DrawdownPoint>) {
        (self.equity_curve, self.drawdown_curve)
    }
}

/// Final statistics for a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestStats {
    /// Initial capital
    pub initial_capital: f64,
    /// Capital after all trades and forced closes
    pub final_capital: f64,
    /// Absolute return
    pub total_return: f64,
    /// Total return percentage
    pub total_return_pct: f64,
    /// Total number of completed trades
    pub total_trades: usize,
    /// Number of winning trades
    pub winning_trades: usize,
    /// Number of losing trades
    pub losing_trades: usize,
    /// Win rate percentage
    pub win_rate_pct: f64,
    /// Average profit per winning trade
    pub avg_win: f64,
    /// Average loss per losing trade, as a positive magnitude
    pub avg_loss: f64,
    /// Gross profit over gross loss; 0.0 when there are no losses
    pub profit_factor: f64,
    /// Deepest equity decline from a running peak
    pub max_drawdown: f64,
    /// Deepest decline as percent of the peak
    pub max_drawdown_pct: f64,
    /// Annualized Sharpe ratio over per-trade returns, risk-free rate 0
    pub sharpe_ratio: f64,
    /// Sortino ratio over per-trade returns
    pub sortino_ratio: f64,
    /// Number of bars replayed after warm-up
    pub bars_processed: usize,
}

impl BacktestStats {
    /// Compute statistics from the completed trade list and tracked curves.
    pub fn compute(
        initial_capital: f64,
        final_capital: f64,
        trades: &[Trade],
        tracker: &EquityTracker,
        bars_processed: usize,
    ) -> Self {
        let total_return = final_capital - initial_capital;
        let total_return_pct = if initial_capital > 0.0 {
            total_return / initial_capital * 100.0
        } else {
            0.0
        };

        let mut winning_trades = 0;
        let mut losing_trades = 0;
        let mut gross_profit = 0.0;
        let mut gross_loss = 0.0;
        for trade in trades {
            if trade.pnl > 0.0 {
                winning_trades += 1;
                gross_profit += trade.pnl;
            } else if trade.pnl < 0.0 {
                losing_trades += 1;
                gross_loss += trade.pnl.abs();
            }
        }

        let win_rate_pct = if trades.is_empty() {
            0.0
        } else {
            winning_trades as f64 / trades.len() as f64 * 100.0
        };
        let avg_win = if winning_trades > 0 {
            gross_profit / winning_trades as f64
        } else {
            0.0
        };
        let avg_loss = if losing_trades > 0 {
            gross_loss / losing_trades as f64
        } else {
            0.0
        };
        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else {
            0.0
        };

        let returns: Vec<f64> = trades.iter().map(|t| t.pnl_pct).collect();

        Self {
            initial_capital,
            final_capital,
            total_return,
            total_return_pct,
            total_trades: trades.len(),
            winning_trades,
            losing_trades,
            win_rate_pct,
            avg_win,
            avg_loss,
            profit_factor,
            max_drawdown: tracker.max_drawdown(),
            max_drawdown_pct: tracker.max_drawdown_pct(),
            sharpe_ratio: sharpe_ratio(&returns),
            sortino_ratio: sortino_ratio(&returns),
            bars_processed,
        }
    }
}

/// Annualized Sharpe ratio over a return series, risk-free rate 0.
///
/// Uses the population standard deviation. Returns 0.0 when the series is
/// empty or has no variance.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().mean();
    let std_dev = returns.iter().population_std_dev();
    if std_dev > 0.0 {
        mean / std_dev * TRADING_DAYS.sqrt()
    } else {
        0.0
    }
}

/// Sortino ratio: like Sharpe but penalizing only downside deviation.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().mean();
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.is_empty() {
        return 0.0;
    }
    let downside_dev =
        (downside.iter().map(|r| r.powi(2)).sum::<f64>() / downside.len() as f64).sqrt();
    if downside_dev > 0.0 {
        mean / downside_dev * TRADING_DAYS.sqrt()
    } else {
        0.0
    }
}
