//! Backtest report generation.

use aiquant_core::types::Trade;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::engine::BacktestConfig;
use crate::statistics::{BacktestStats, DrawdownPoint, EquityPoint};

/// Number of trades listed in the best/worst markdown tables.
const RANKED_TRADES: usize = 5;

/// Complete backtest report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Configuration used
    pub config: BacktestConfig,
    /// Name of the oracle that drove the run
    pub oracle_name: String,
    /// Statistics
    pub stats: BacktestStats,
    /// Completed trades in entry order
    pub trades: Vec<Trade>,
    /// Mark-to-market equity per processed bar
    pub equity_curve: Vec<EquityPoint>,
    /// Percent decline from the running peak per processed bar
    pub drawdown_curve: Vec<DrawdownPoint>,
    /// True when the run was stopped by a cancellation request
    pub cancelled: bool,
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Symbol:              {}\n", self.config.symbol));
        s.push_str(&format!(
            "  Timeframe:           {}\n",
            self.config.timeframe
        ));
        s.push_str(&format!("  Oracle:              {}\n", self.oracle_name));
        if self.cancelled {
            s.push_str("  (run cancelled before the final bar)\n");
        }
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Initial Capital:     ${:.2}\n",
            self.stats.initial_capital
        ));
        s.push_str(&format!(
            "  Final Capital:       ${:.2}\n",
            self.stats.final_capital
        ));
        s.push_str(&format!(
            "  Total Return:        {:.2}%\n",
            self.stats.total_return_pct
        ));
        s.push_str(&format!(
            "  Max Drawdown:        {:.2}%\n",
            self.stats.max_drawdown_pct
        ));
        s.push('\n');

        s.push_str("RISK METRICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Sharpe Ratio:        {:.2}\n",
            self.stats.sharpe_ratio
        ));
        s.push_str(&format!(
            "  Sortino Ratio:       {:.2}\n",
            self.stats.sortino_ratio
        ));
        s.push_str(&format!(
            "  Profit Factor:       {:.2}\n",
            self.stats.profit_factor
        ));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Total Trades:        {}\n",
            self.stats.total_trades
        ));
        s.push_str(&format!(
            "  Winning Trades:      {}\n",
            self.stats.winning_trades
        ));
        s.push_str(&format!(
            "  Losing Trades:       {}\n",
            self.stats.losing_trades
        ));
        s.push_str(&format!(
            "  Win Rate:            {:.2}%\n",
            self.stats.win_rate_pct
        ));
        s.push_str(&format!("  Avg Win:             ${:.2}\n", self.stats.avg_win));
        s.push_str(&format!(
            "  Avg Loss:            ${:.2}\n",
            self.stats.avg_loss
        ));
        s.push('\n');

        s.push_str("EXECUTION\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Bars Processed:      {}\n",
            self.stats.bars_processed
        ));
        s.push_str(&format!(
            "  Equity Points:       {}\n",
            self.equity_curve.len()
        ));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to a markdown document with ranked best and worst trades.
    pub fn to_markdown(&self) -> String {
        let mut s = String::new();

        s.push_str(&format!(
            "# Backtest Report: {} ({})\n\n",
            self.config.symbol, self.config.timeframe
        ));
        s.push_str(&format!("Oracle: {}\n\n", self.oracle_name));

        s.push_str("## Performance\n\n");
        s.push_str("| Metric | Value |\n|---|---|\n");
        s.push_str(&format!(
            "| Initial Capital | ${:.2} |\n",
            self.stats.initial_capital
        ));
        s.push_str(&format!(
            "| Final Capital | ${:.2} |\n",
            self.stats.final_capital
        ));
        s.push_str(&format!(
            "| Total Return | {:.2}% |\n",
            self.stats.total_return_pct
        ));
        s.push_str(&format!(
            "| Max Drawdown | {:.2}% |\n",
            self.stats.max_drawdown_pct
        ));
        s.push_str(&format!("| Sharpe Ratio | {:.2} |\n", self.stats.sharpe_ratio));
        s.push_str(&format!(
            "| Sortino Ratio | {:.2} |\n",
            self.stats.sortino_ratio
        ));
        s.push_str(&format!(
            "| Profit Factor | {:.2} |\n",
            self.stats.profit_factor
        ));
        s.push_str(&format!("| Win Rate | {:.2}% |\n", self.stats.win_rate_pct));
        s.push_str(&format!("| Total Trades | {} |\n\n", self.stats.total_trades));

        let mut ranked: Vec<&Trade> = self.trades.iter().collect();
        ranked.sort_by(|a, b| b.pnl.partial_cmp(&a.pnl).unwrap_or(std::cmp::Ordering::Equal));

        s.push_str("## Best Trades\n\n");
        Self::push_trade_table(&mut s, ranked.iter().take(RANKED_TRADES).copied());

        s.push_str("## Worst Trades\n\n");
        Self::push_trade_table(&mut s, ranked.iter().rev().take(RANKED_TRADES).copied());

        s
    }

    fn push_trade_table<'a>(s: &mut String, trades: impl Iterator<Item = &'a Trade>) {
        s.push_str("| Entry | Exit | Side | Entry Px | Exit Px | P&L | P&L % | Reason |\n");
        s.push_str("|---|---|---|---|---|---|---|---|\n");
        let mut any = false;
        for trade in trades {
            any = true;
            s.push_str(&format!(
                "| {} | {} | {} | {:.4} | {:.4} | {:.2} | {:.2}% | {} |\n",
                format_timestamp(trade.entry_time),
                format_timestamp(trade.exit_time),
                trade.side,
                trade.entry_price,
                trade.exit_price,
                trade.pnl,
                trade.pnl_pct,
                trade.exit_reason,
            ));
        }
        if !any {
            s.push_str("| - | - | - | - | - | - | - | - |\n");
        }
        s.push('\n');
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a report previously exported with [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Export the equity curve to CSV.
    pub fn equity_to_csv(&self) -> String {
        let mut csv = String::from("timestamp,equity\n");
        for point in &self.equity_curve {
            csv.push_str(&format!("{},{}\n", point.timestamp, point.equity));
        }
        csv
    }
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::EquityTracker;
    use aiquant_core::types::{ExitReason, Side};

    fn sample_report() -> BacktestReport {
        let trades = vec![
            Trade {
                entry_time: 0,
                exit_time: 3_600_000,
                side: Side::Long,
                entry_price: 100.0,
                exit_price: 104.0,
                quantity: 1.0,
                leverage: 2.0,
                pnl: 8.0,
                pnl_pct: 8.0,
                commission: 0.16,
                exit_reason: ExitReason::TakeProfit,
            },
            Trade {
                entry_time: 7_200_000,
                exit_time: 10_800_000,
                side: Side::Short,
                entry_price: 104.0,
                exit_price: 106.0,
                quantity: 1.0,
                leverage: 2.0,
                pnl: -4.0,
                pnl_pct: -4.0,
                commission: 0.17,
                exit_reason: ExitReason::StopLoss,
            },
        ];
        let mut tracker = EquityTracker::new(100.0, 0);
        tracker.record(3_600_000, 108.0);
        tracker.record(10_800_000, 104.0);
        let stats = BacktestStats::compute(100.0, 104.0, &trades, &tracker, 2);
        let (equity_curve, drawdown_curve) = tracker.into_curves();

        BacktestReport {
            config: BacktestConfig::default(),
            oracle_name: "scripted".to_string(),
            stats,
            trades,
            equity_curve,
            drawdown_curve,
            cancelled: false,
        }
    }

    #[test]
    fn test_summary_contains_headline_numbers() {
        let report = sample_report();
        let summary = report.summary();
        assert!(summary.contains("Total Return"));
        assert!(summary.contains("4.00%"));
        assert!(summary.contains("Total Trades:        2"));
    }

    #[test]
    fn test_markdown_ranks_trades() {
        let report = sample_report();
        let markdown = report.to_markdown();
        assert!(markdown.contains("## Best Trades"));
        assert!(markdown.contains("## Worst Trades"));
        // best table leads with the winner
        let best_section = markdown.split("## Best Trades").nth(1).unwrap();
        let first_row = best_section
            .lines()
            .find(|line| line.starts_with('|') && !line.contains("---") && !line.contains("Entry"))
            .unwrap();
        assert!(first_row.contains("TAKE_PROFIT"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        let restored = BacktestReport::from_json(&json).unwrap();

        assert_eq!(restored.trades.len(), report.trades.len());
        assert_eq!(restored.equity_curve.len(), report.equity_curve.len());
        assert!((restored.stats.final_capital - report.stats.final_capital).abs() < 1e-9);
        assert!((restored.stats.sharpe_ratio - report.stats.sharpe_ratio).abs() < 1e-9);
        assert!((restored.trades[0].pnl - report.trades[0].pnl).abs() < 1e-9);
    }

    #[test]
    fn test_equity_csv_has_all_points() {
        let report = sample_report();
        let csv = report.equity_to_csv();
        assert_eq!(csv.lines().count(), 1 + report.equity_curve.len());
    }
}
