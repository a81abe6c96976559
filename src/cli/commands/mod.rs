//! CLI command implementations.

pub mod backtest;
pub mod report;
pub mod validate;
