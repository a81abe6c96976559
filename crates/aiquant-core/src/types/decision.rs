//! Decision-oracle output contract.
//!
//! These types mirror the external oracle's JSON schema, hence the
//! camelCase field names on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action requested by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OracleAction {
    Buy,
    Sell,
    Hold,
    Close,
}

impl fmt::Display for OracleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleAction::Buy => write!(f, "BUY"),
            OracleAction::Sell => write!(f, "SELL"),
            OracleAction::Hold => write!(f, "HOLD"),
            OracleAction::Close => write!(f, "CLOSE"),
        }
    }
}

/// A trading decision returned by the oracle.
///
/// `action` and `confidence` are required on the wire; a response missing
/// either (or carrying a non-numeric confidence) fails deserialization and
/// is degraded to HOLD by the orchestrator. All numeric fields must be
/// passed through [`OracleDecision::clamped`] before use regardless of what
/// the oracle returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleDecision {
    pub action: OracleAction,
    /// Confidence in the decision, 0-100
    pub confidence: f64,
    /// Free-form explanation; audit trail for HOLD fallbacks
    #[serde(default)]
    pub reasoning: String,
    /// Percent of capital to commit as margin, 1-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_size: Option<f64>,
    /// Leverage multiplier, 1-30
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
    /// Stop-loss distance from entry, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    /// Take-profit distance from entry, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
}

impl OracleDecision {
    /// A HOLD decision with zero confidence, used as the failure fallback.
    pub fn hold(reasoning: impl Into<String>) -> Self {
        Self {
            action: OracleAction::Hold,
            confidence: 0.0,
            reasoning: reasoning.into(),
            position_size: None,
            leverage: None,
            stop_loss: None,
            take_profit: None,
        }
    }

    /// Clamp every numeric field to its documented range.
    pub fn clamped(mut self) -> Self {
        self.confidence = self.confidence.clamp(0.0, 100.0);
        self.position_size = self.position_size.map(|v| v.clamp(1.0, 100.0));
        self.leverage = self.leverage.map(|v| v.clamp(1.0, 30.0));
        self.stop_loss = self.stop_loss.map(|v| v.clamp(0.0, 100.0));
        self.take_profit = self.take_profit.map(|v| v.clamp(0.0, 100.0));
        self
    }

    /// Check whether this decision can open a position.
    pub fn is_entry(&self) -> bool {
        matches!(self.action, OracleAction::Buy | OracleAction::Sell)
    }
}
