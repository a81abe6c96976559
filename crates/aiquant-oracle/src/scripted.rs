//! Deterministic scripted oracle for tests and dry runs.

use aiquant_core::error::OracleError;
use aiquant_core::traits::DecisionOracle;
use aiquant_core::types::{MarketSnapshot, OracleDecision};
use async_trait::async_trait;
use std::collections::HashMap;

/// An oracle that replays a fixed script.
///
/// Decisions are keyed by the snapshot's bar timestamp; any timestamp
/// without an entry gets the default decision (HOLD unless configured
/// otherwise). Calls are side-effect free, so runs are fully reproducible.
pub struct ScriptedOracle {
    default: OracleDecision,
    script: HashMap<i64, OracleDecision>,
}

impl ScriptedOracle {
    /// Create a scripted oracle that holds by default.
    pub fn new() -> Self {
        Self {
            default: OracleDecision::hold("scripted default"),
            script: HashMap::new(),
        }
    }

    /// Create an oracle that always returns the same decision.
    pub fn always(decision: OracleDecision) -> Self {
        Self {
            default: decision,
            script: HashMap::new(),
        }
    }

    /// Schedule a decision for the bar with the given timestamp.
    pub fn at_timestamp(mut self, timestamp: i64, decision: OracleDecision) -> Self {
        self.script.insert(timestamp, decision);
        self
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionOracle for ScriptedOracle {
    async fn decide(&self, snapshot: &MarketSnapshot) -> Result<OracleDecision, OracleError> {
        Ok(self
            .script
            .get(&snapshot.metadata.timestamp)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiquant_core::types::{
        AccountState, IndicatorSnapshot, OracleAction, PerformanceSnapshot, SnapshotMetadata,
    };

    fn snapshot_at(timestamp: i64) -> MarketSnapshot {
        MarketSnapshot {
            symbol: "BTCUSDT".to_string(),
            price: 100.0,
            indicators: IndicatorSnapshot::default(),
            account: AccountState {
                balance: 100.0,
                positions: 0,
                total_value: 100.0,
                unrealized_pnl: 0.0,
            },
            performance: PerformanceSnapshot::default(),
            metadata: SnapshotMetadata {
                timestamp,
                wakeup_count: 0,
                last_action: None,
                consecutive_losses: None,
            },
        }
    }

    #[tokio::test]
    async fn test_scripted_decision_fires_once() {
        let buy = OracleDecision {
            action: OracleAction::Buy,
            confidence: 90.0,
            reasoning: "scripted".to_string(),
            position_size: Some(20.0),
            leverage: Some(3.0),
            stop_loss: Some(2.0),
            take_profit: Some(4.0),
        };
        let oracle = ScriptedOracle::new().at_timestamp(5000, buy.clone());

        let hit = oracle.decide(&snapshot_at(5000)).await.unwrap();
        assert_eq!(hit.action, OracleAction::Buy);

        let miss = oracle.decide(&snapshot_at(6000)).await.unwrap();
        assert_eq!(miss.action, OracleAction::Hold);
        assert_eq!(miss.confidence, 0.0);
    }
}
