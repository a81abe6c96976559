//! Core types and traits for the aiquant engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - The single-position model (Position, Trade)
//! - The decision-oracle wire contract (MarketSnapshot, OracleDecision)
//! - Core traits for indicators and decision oracles

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use traits::*;
pub use types::*;
