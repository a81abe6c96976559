//! Bar-replay backtesting engine.
//!
//! Replays an ordered bar series, consults a decision oracle while flat,
//! simulates fills with fees and slippage, and produces risk/performance
//! statistics. Processing is strictly sequential: indicators and decisions
//! never see future bars.

mod engine;
mod fills;
mod report;
mod statistics;

pub use engine::{BacktestConfig, BacktestEngine};
pub use fills::{close_position, entry_price, forced_exit_price};
pub use report::BacktestReport;
pub use statistics::{
    BacktestStats, DrawdownPoint, EquityPoint, EquityTracker, sharpe_ratio, sortino_ratio,
};
