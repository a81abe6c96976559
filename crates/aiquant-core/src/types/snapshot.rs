//! Market/account snapshot sent to the decision oracle.
//!
//! Field names follow the external oracle's JSON contract (camelCase).

use serde::{Deserialize, Serialize};

use super::OracleAction;

/// Per-bar indicator values. `None` means the indicator is still inside its
/// warm-up window; consumers must not treat that as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema200: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_middle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_rate: Option<f64>,
}

/// Account state at the moment of the oracle call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    /// Free capital
    pub balance: f64,
    /// Number of open positions (0 or 1 in this engine)
    pub positions: u32,
    /// Balance plus unrealized P&L
    pub total_value: f64,
    #[serde(rename = "unrealizedPnL")]
    pub unrealized_pnl: f64,
}

/// Running performance figures fed back to the oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    /// Total return percent since the run started
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub win_rate: f64,
    pub total_trades: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_drawdown: Option<f64>,
}

/// Call metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Current bar timestamp in milliseconds
    pub timestamp: i64,
    /// Number of oracle consultations so far in this run
    pub wakeup_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action: Option<OracleAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consecutive_losses: Option<u32>,
}

/// Complete input to [`crate::traits::DecisionOracle::decide`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub symbol: String,
    /// Current bar close price
    pub price: f64,
    pub indicators: IndicatorSnapshot,
    pub account: AccountState,
    pub performance: PerformanceSnapshot,
    pub metadata: SnapshotMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_format() {
        let snapshot = MarketSnapshot {
            symbol: "BTCUSDT".to_string(),
            price: 50_000.0,
            indicators: IndicatorSnapshot {
                rsi: Some(55.2),
                macd_histogram: Some(-1.5),
                ..Default::default()
            },
            account: AccountState {
                balance: 100.0,
                positions: 0,
                total_value: 100.0,
                unrealized_pnl: 0.0,
            },
            performance: PerformanceSnapshot::default(),
            metadata: SnapshotMetadata {
                timestamp: 1_700_000_000_000,
                wakeup_count: 3,
                last_action: Some(OracleAction::Hold),
                consecutive_losses: None,
            },
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"macdHistogram\""));
        assert!(json.contains("\"totalValue\""));
        assert!(json.contains("\"unrealizedPnL\""));
        assert!(json.contains("\"wakeupCount\""));
        // Unavailable indicators are omitted, never serialized as zero
        assert!(!json.contains("\"ema200\""));
    }
}
