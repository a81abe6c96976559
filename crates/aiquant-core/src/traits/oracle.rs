//! Decision-oracle trait definition.

use crate::error::OracleError;
use crate::types::{MarketSnapshot, OracleDecision};
use async_trait::async_trait;

/// An external decision oracle.
///
/// The oracle maps a market/account snapshot to a trading decision. It is
/// consumed as a black box; prompt construction and response parsing are the
/// adapter's concern. Any error from `decide` is absorbed at the
/// orchestrator boundary and converted into a HOLD decision with zero
/// confidence, so a failing oracle can never abort a run.
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    /// Request a decision for the given snapshot.
    async fn decide(&self, snapshot: &MarketSnapshot) -> Result<OracleDecision, OracleError>;

    /// Get the oracle name (for logging and reports).
    fn name(&self) -> &str;
}
