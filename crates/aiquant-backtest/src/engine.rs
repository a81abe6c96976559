//! Bar-replay orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aiquant_core::error::{DataError, EngineResult};
use aiquant_core::traits::DecisionOracle;
use aiquant_core::types::{
    AccountState, Bar, ExitReason, MarketSnapshot, OracleAction, OracleDecision,
    PerformanceSnapshot, Position, Side, SnapshotMetadata, Timeframe, Trade,
};
use aiquant_indicators::{IndicatorParams, IndicatorSeries};
use aiquant_risk::{RiskConfig, RiskValidator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fills;
use crate::report::BacktestReport;
use crate::statistics::{sharpe_ratio, BacktestStats, EquityTracker};

/// Backtest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Instrument symbol, echoed into snapshots and reports
    pub symbol: String,
    /// Bar timeframe of the input series
    pub timeframe: Timeframe,
    /// Initial capital
    pub initial_capital: f64,
    /// Commission as a fraction of notional, charged at entry and exit
    pub commission_rate: f64,
    /// Adverse slippage fraction applied to market fills
    pub slippage: f64,
    /// Risk configuration
    pub risk: RiskConfig,
    /// Indicator lookbacks; the longest one sets the warm-up window
    pub indicators: IndicatorParams,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            timeframe: Timeframe::Hour1,
            initial_capital: 10_000.0,
            commission_rate: 0.0004,
            slippage: 0.0005,
            risk: RiskConfig::default(),
            indicators: IndicatorParams::default(),
        }
    }
}

/// Drives a decision oracle over a historical bar series.
///
/// The replay is strictly sequential. Exits are evaluated before entries on
/// every bar, the oracle is consulted at most once per bar and only while
/// flat, and any position still open when the series ends is force-closed
/// against the final bar.
pub struct BacktestEngine {
    config: BacktestConfig,
    cancel: Arc<AtomicBool>,
}

impl BacktestEngine {
    /// Create a new backtest engine.
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the replay at the next bar boundary when set.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Replay the bar series against the oracle.
    ///
    /// Data preconditions are fatal and checked before the first bar. Oracle
    /// and risk failures are absorbed inside the loop and never abort a run.
    pub async fn run(
        &self,
        oracle: &dyn DecisionOracle,
        bars: &[Bar],
    ) -> EngineResult<BacktestReport> {
        validate_bars(bars)?;

        let warmup = self.config.indicators.warmup();
        if bars.len() <= warmup {
            return Err(DataError::InsufficientHistory {
                required: warmup + 1,
                available: bars.len(),
            }
            .into());
        }

        info!(
            symbol = %self.config.symbol,
            bars = bars.len(),
            warmup,
            oracle = oracle.name(),
            "starting backtest"
        );

        let indicators = IndicatorSeries::compute(bars, &self.config.indicators);
        let validator = RiskValidator::new(self.config.risk.clone());

        let mut capital = self.config.initial_capital;
        let mut position: Option<Position> = None;
        let mut trades: Vec<Trade> = Vec::new();
        let mut tracker = EquityTracker::new(capital, bars[warmup - 1].timestamp);

        let mut wakeup_count: u64 = 0;
        let mut last_action: Option<OracleAction> = None;
        let mut loss_streak: u32 = 0;
        let mut bars_processed = 0usize;
        let mut cancelled = false;
        // Bar a leftover position is force-closed against. Defaults to the
        // final bar; on cancellation it becomes the first unprocessed bar so
        // the exit timestamp stays strictly after the entry.
        let mut close_index = bars.len() - 1;

        for i in warmup..bars.len() {
            if self.cancel.load(Ordering::Relaxed) {
                info!(bar = i, "cancellation requested, stopping replay");
                cancelled = true;
                close_index = i;
                break;
            }

            let bar = &bars[i];

            // Exits first; a close and a fresh consult may share a bar.
            if let Some(open) = position.take() {
                match check_exit(&open, bar) {
                    Some((reason, exit_price)) => {
                        let trade = fills::close_position(
                            &open,
                            exit_price,
                            bar.timestamp,
                            reason,
                            self.config.commission_rate,
                        );
                        capital += trade.pnl;
                        loss_streak = if trade.is_win() { 0 } else { loss_streak + 1 };
                        debug!(
                            reason = %trade.exit_reason,
                            pnl = trade.pnl,
                            capital,
                            "position closed"
                        );
                        trades.push(trade);
                    }
                    None => position = Some(open),
                }
            }

            // An entry on the final bar could never be held, so the oracle
            // is not consulted there.
            if position.is_none() && i + 1 < bars.len() {
                let snapshot = self.build_snapshot(
                    bar,
                    &indicators,
                    i,
                    capital,
                    &trades,
                    &tracker,
                    wakeup_count,
                    last_action,
                    loss_streak,
                );
                wakeup_count += 1;

                let decision = match oracle.decide(&snapshot).await {
                    Ok(decision) => decision.clamped(),
                    Err(err) => {
                        warn!(error = %err, bar = i, "oracle failed, holding");
                        OracleDecision::hold(format!("oracle error: {err}"))
                    }
                };
                last_action = Some(decision.action);

                if decision.is_entry() {
                    let side = if decision.action == OracleAction::Buy {
                        Side::Long
                    } else {
                        Side::Short
                    };
                    let entry = fills::entry_price(bar.close, side, self.config.slippage);
                    match validator.evaluate(&decision, capital, entry, bar.timestamp) {
                        Ok(open) => {
                            let entry_commission =
                                fills::commission(open.notional(), self.config.commission_rate);
                            capital -= entry_commission;
                            debug!(
                                side = %open.side,
                                entry_price = open.entry_price,
                                quantity = open.quantity,
                                leverage = open.leverage,
                                "position opened"
                            );
                            position = Some(open);
                        }
                        Err(err) => {
                            debug!(reason = %err, bar = i, "entry rejected");
                        }
                    }
                }
            }

            let equity = capital
                + position
                    .as_ref()
                    .map(|p| p.unrealized_pnl(bar.close))
                    .unwrap_or(0.0);
            tracker.record(bar.timestamp, equity);
            bars_processed += 1;
        }

        // Force-close anything still open so the run's P&L is complete.
        if let Some(open) = position.take() {
            let bar = &bars[close_index];
            let exit_price = fills::forced_exit_price(bar.close, open.side, self.config.slippage);
            let trade = fills::close_position(
                &open,
                exit_price,
                bar.timestamp,
                ExitReason::ForcedClose,
                self.config.commission_rate,
            );
            capital += trade.pnl;
            info!(pnl = trade.pnl, "force-closed open position at series end");
            trades.push(trade);
        }

        let stats =
            BacktestStats::compute(self.config.initial_capital, capital, &trades, &tracker, bars_processed);
        let (equity_curve, drawdown_curve) = tracker.into_curves();

        info!(
            trades = stats.total_trades,
            final_capital = stats.final_capital,
            total_return_pct = stats.total_return_pct,
            "backtest finished"
        );

        Ok(BacktestReport {
            config: self.config.clone(),
            oracle_name: oracle.name().to_string(),
            stats,
            trades,
            equity_curve,
            drawdown_curve,
            cancelled,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_snapshot(
        &self,
        bar: &Bar,
        indicators: &IndicatorSeries,
        index: usize,
        capital: f64,
        trades: &[Trade],
        tracker: &EquityTracker,
        wakeup_count: u64,
        last_action: Option<OracleAction>,
        loss_streak: u32,
    ) -> MarketSnapshot {
        let wins = trades.iter().filter(|t| t.is_win()).count();
        let win_rate = if trades.is_empty() {
            0.0
        } else {
            wins as f64 / trades.len() as f64 * 100.0
        };
        let returns: Vec<f64> = trades.iter().map(|t| t.pnl_pct).collect();
        let initial = self.config.initial_capital;
        let total_return = if initial > 0.0 {
            (capital - initial) / initial * 100.0
        } else {
            0.0
        };

        MarketSnapshot {
            symbol: self.config.symbol.clone(),
            price: bar.close,
            indicators: indicators.snapshot(index),
            // The oracle is only consulted while flat.
            account: AccountState {
                balance: capital,
                positions: 0,
                total_value: capital,
                unrealized_pnl: 0.0,
            },
            performance: PerformanceSnapshot {
                total_return,
                sharpe_ratio: sharpe_ratio(&returns),
                win_rate,
                total_trades: trades.len() as u32,
                max_drawdown: Some(tracker.max_drawdown_pct()),
            },
            metadata: SnapshotMetadata {
                timestamp: bar.timestamp,
                wakeup_count,
                last_action,
                consecutive_losses: if loss_streak > 0 {
                    Some(loss_streak)
                } else {
                    None
                },
            },
        }
    }
}

/// Intrabar exit check. The stop-loss is evaluated first, so a bar whose
/// range spans both levels counts as a stop.
fn check_exit(position: &Position, bar: &Bar) -> Option<(ExitReason, f64)> {
    match position.side {
        Side::Long => {
            if bar.low <= position.stop_loss {
                return Some((ExitReason::StopLoss, position.stop_loss));
            }
            if bar.high >= position.take_profit {
                return Some((ExitReason::TakeProfit, position.take_profit));
            }
        }
        Side::Short => {
            if bar.high >= position.stop_loss {
                return Some((ExitReason::StopLoss, position.stop_loss));
            }
            if bar.low <= position.take_profit {
                return Some((ExitReason::TakeProfit, position.take_profit));
            }
        }
    }
    None
}

fn validate_bars(bars: &[Bar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::EmptySeries);
    }
    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].timestamp == pair[0].timestamp {
            return Err(DataError::DuplicateTimestamp {
                timestamp: pair[1].timestamp,
            });
        }
        if pair[1].timestamp < pair[0].timestamp {
            return Err(DataError::UnorderedTimestamps { index: i + 1 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiquant_core::error::{EngineError, OracleError};
    use aiquant_oracle::ScriptedOracle;
    use async_trait::async_trait;

    const HOUR: i64 = 3_600_000;

    struct FailingOracle;

    #[async_trait]
    impl DecisionOracle for FailingOracle {
        async fn decide(&self, _snapshot: &MarketSnapshot) -> Result<OracleDecision, OracleError> {
            Err(OracleError::Network("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn buy_decision() -> OracleDecision {
        OracleDecision {
            action: OracleAction::Buy,
            confidence: 90.0,
            reasoning: "test entry".to_string(),
            position_size: Some(20.0),
            leverage: Some(3.0),
            stop_loss: Some(2.0),
            take_profit: Some(4.0),
        }
    }

    /// 250 rising bars: close 100 + 0.5 per bar, one point of range each way.
    fn rising_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.5;
                Bar::new(
                    i as i64 * HOUR,
                    close - 0.25,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1_000.0,
                )
            })
            .collect()
    }

    fn small_params() -> IndicatorParams {
        IndicatorParams {
            rsi_period: 5,
            macd_fast: 3,
            macd_slow: 6,
            macd_signal: 3,
            ema_short: 5,
            ema_medium: 10,
            ema_long: 15,
            bollinger_period: 5,
            bollinger_k: 2.0,
            atr_period: 5,
            levels_window: 3,
        }
    }

    #[tokio::test]
    async fn test_scripted_take_profit_run() {
        let config = BacktestConfig {
            initial_capital: 100.0,
            commission_rate: 0.0004,
            slippage: 0.0005,
            ..BacktestConfig::default()
        };
        let engine = BacktestEngine::new(config);
        let bars = rising_bars(250);
        let oracle = ScriptedOracle::new().at_timestamp(201 * HOUR, buy_decision());

        let report = engine.run(&oracle, &bars).await.unwrap();

        assert_eq!(report.trades.len(), 1);
        let trade = &report.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
        assert_eq!(trade.side, Side::Long);
        assert_eq!(trade.entry_time, 201 * HOUR);

        // Closed-form expectation for the single trade
        let entry: f64 = 200.5 * 1.0005;
        let qty = ((0.2 * 100.0 / entry) / 0.001).floor() * 0.001;
        let take = entry * 1.04;
        let entry_commission = qty * 3.0 * entry * 0.0004;
        let exit_commission = qty * 3.0 * take * 0.0004;
        let expected_pnl = 0.04 * (qty * entry) * 3.0 - exit_commission;

        assert!((trade.entry_price - entry).abs() < 1e-9);
        assert!((trade.exit_price - take).abs() < 1e-9);
        assert!((trade.quantity - qty).abs() < 1e-9);
        assert!((trade.pnl - expected_pnl).abs() < 1e-6);
        assert!((trade.commission - (entry_commission + exit_commission)).abs() < 1e-6);
        assert!(
            (report.stats.final_capital - (100.0 - entry_commission + expected_pnl)).abs() < 1e-6
        );
    }

    #[tokio::test]
    async fn test_equity_curve_length() {
        let config = BacktestConfig {
            initial_capital: 100.0,
            ..BacktestConfig::default()
        };
        let engine = BacktestEngine::new(config);
        let bars = rising_bars(250);

        let report = engine.run(&ScriptedOracle::new(), &bars).await.unwrap();

        // 200-bar warm-up leaves 50 processed bars, plus the seed point
        assert_eq!(report.stats.bars_processed, 50);
        assert_eq!(report.equity_curve.len(), 51);
        assert_eq!(report.drawdown_curve.len(), 51);
        assert!(report.trades.is_empty());
    }

    #[tokio::test]
    async fn test_stop_wins_when_bar_spans_both_levels() {
        let config = BacktestConfig {
            initial_capital: 1_000.0,
            slippage: 0.0,
            commission_rate: 0.0,
            indicators: small_params(),
            ..BacktestConfig::default()
        };
        let engine = BacktestEngine::new(config);

        // Flat series, entry at bar 16, then one bar spanning both exits.
        let mut bars: Vec<Bar> = (0..40)
            .map(|i| Bar::new(i as i64 * HOUR, 100.0, 100.5, 99.5, 100.0, 1_000.0))
            .collect();
        bars[17] = Bar::new(17 * HOUR, 100.0, 106.0, 97.0, 100.0, 1_000.0);

        let oracle = ScriptedOracle::new().at_timestamp(16 * HOUR, buy_decision());
        let report = engine.run(&oracle, &bars).await.unwrap();

        assert_eq!(report.trades.len(), 1);
        let trade = &report.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.exit_time, 17 * HOUR);
        // Fill at the exact stop level, no slippage
        assert!((trade.exit_price - 98.0).abs() < 1e-9);
        assert!(trade.pnl < 0.0);
    }

    #[tokio::test]
    async fn test_open_position_force_closed_at_end() {
        let config = BacktestConfig {
            initial_capital: 1_000.0,
            indicators: small_params(),
            ..BacktestConfig::default()
        };
        let engine = BacktestEngine::new(config);
        let bars: Vec<Bar> = (0..30)
            .map(|i| Bar::new(i as i64 * HOUR, 100.0, 100.5, 99.5, 100.0, 1_000.0))
            .collect();

        // Take profit far out of reach for a flat series
        let decision = OracleDecision {
            take_profit: Some(50.0),
            stop_loss: Some(50.0),
            ..buy_decision()
        };
        let oracle = ScriptedOracle::new().at_timestamp(20 * HOUR, decision);
        let report = engine.run(&oracle, &bars).await.unwrap();

        assert_eq!(report.trades.len(), 1);
        let trade = &report.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::ForcedClose);
        assert_eq!(trade.exit_time, 29 * HOUR);
        assert!(trade.exit_time > trade.entry_time);
        // Forced closes pay slippage
        assert!((trade.exit_price - 100.0 * (1.0 - 0.0005)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_oracle_errors_degrade_to_hold() {
        let config = BacktestConfig {
            initial_capital: 1_000.0,
            indicators: small_params(),
            ..BacktestConfig::default()
        };
        let engine = BacktestEngine::new(config);
        let bars = rising_bars(40);

        let report = engine.run(&FailingOracle, &bars).await.unwrap();

        // Run completes untouched by the failures
        assert!(report.trades.is_empty());
        assert!((report.stats.final_capital - 1_000.0).abs() < 1e-12);
        assert_eq!(report.stats.bars_processed, 25);
    }

    #[tokio::test]
    async fn test_cancellation_stops_replay() {
        let config = BacktestConfig {
            initial_capital: 1_000.0,
            indicators: small_params(),
            ..BacktestConfig::default()
        };
        let engine = BacktestEngine::new(config);
        engine.cancel_flag().store(true, Ordering::Relaxed);

        let bars = rising_bars(40);
        let report = engine.run(&ScriptedOracle::new(), &bars).await.unwrap();

        assert!(report.cancelled);
        assert_eq!(report.stats.bars_processed, 0);
        // Seed point only
        assert_eq!(report.equity_curve.len(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_history_is_fatal() {
        let engine = BacktestEngine::new(BacktestConfig::default());
        let bars = rising_bars(100); // default warm-up is 200

        let err = engine.run(&ScriptedOracle::new(), &bars).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Data(DataError::InsufficientHistory { required: 201, .. })
        ));
    }

    #[tokio::test]
    async fn test_unordered_bars_rejected() {
        let engine = BacktestEngine::new(BacktestConfig::default());
        let mut bars = rising_bars(250);
        bars[10].timestamp = bars[9].timestamp - 1;

        let err = engine.run(&ScriptedOracle::new(), &bars).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Data(DataError::UnorderedTimestamps { index: 10 })
        ));

        let mut bars = rising_bars(250);
        bars[10].timestamp = bars[9].timestamp;
        let err = engine.run(&ScriptedOracle::new(), &bars).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Data(DataError::DuplicateTimestamp { .. })
        ));
    }

    #[tokio::test]
    async fn test_low_confidence_entry_skipped() {
        let config = BacktestConfig {
            initial_capital: 1_000.0,
            indicators: small_params(),
            ..BacktestConfig::default()
        };
        let engine = BacktestEngine::new(config);
        let bars = rising_bars(40);

        let decision = OracleDecision {
            confidence: 30.0,
            ..buy_decision()
        };
        let oracle = ScriptedOracle::new().at_timestamp(20 * HOUR, decision);
        let report = engine.run(&oracle, &bars).await.unwrap();

        assert!(report.trades.is_empty());
    }

    #[test]
    fn test_short_exit_orientation() {
        let position = Position {
            side: Side::Short,
            entry_price: 100.0,
            entry_time: 0,
            quantity: 1.0,
            leverage: 1.0,
            stop_loss: 102.0,
            take_profit: 96.0,
        };

        let stop_bar = Bar::new(HOUR, 101.0, 102.5, 100.5, 101.0, 1.0);
        assert_eq!(
            check_exit(&position, &stop_bar),
            Some((ExitReason::StopLoss, 102.0))
        );

        let take_bar = Bar::new(HOUR, 97.0, 97.5, 95.5, 96.5, 1.0);
        assert_eq!(
            check_exit(&position, &take_bar),
            Some((ExitReason::TakeProfit, 96.0))
        );

        let quiet_bar = Bar::new(HOUR, 100.0, 101.0, 99.0, 100.0, 1.0);
        assert_eq!(check_exit(&position, &quiet_bar), None);
    }
}
