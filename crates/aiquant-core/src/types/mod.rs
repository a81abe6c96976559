//! Core data types for the engine.

mod bar;
mod decision;
mod position;
mod snapshot;
mod timeframe;
mod trade;

pub use bar::{Bar, BarSeries};
pub use decision::{OracleAction, OracleDecision};
pub use position::{Position, Side};
pub use snapshot::{
    AccountState, IndicatorSnapshot, MarketSnapshot, PerformanceSnapshot, SnapshotMetadata,
};
pub use timeframe::Timeframe;
pub use trade::{ExitReason, Trade};
