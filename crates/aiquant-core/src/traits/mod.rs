//! Core trait definitions.

mod indicator;
mod oracle;

pub use indicator::Indicator;
pub use oracle::DecisionOracle;
