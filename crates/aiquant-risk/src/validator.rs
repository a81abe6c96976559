//! Position sizing and pre-open risk checks.

use aiquant_core::error::RiskError;
use aiquant_core::types::{OracleAction, OracleDecision, Position, Side};
use serde::{Deserialize, Serialize};

/// Risk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Minimum oracle confidence required to open
    pub min_confidence: f64,
    /// Minimum notional value (quantity x leverage x entry price)
    pub min_notional: f64,
    /// Instrument quantity step; sizes are rounded down to a multiple
    pub qty_step: f64,
    /// Percent of capital committed when the oracle omits positionSize
    pub default_size_pct: f64,
    /// Leverage used when the oracle omits it
    pub default_leverage: f64,
    /// Stop-loss percent used when the oracle omits it
    pub default_stop_pct: f64,
    /// Take-profit percent used when the oracle omits it
    pub default_take_pct: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            min_confidence: 60.0,
            min_notional: 5.0,
            qty_step: 0.001,
            default_size_pct: 5.0,
            default_leverage: 1.0,
            default_stop_pct: 2.0,
            default_take_pct: 4.0,
        }
    }
}

/// Validates an oracle decision and turns it into a concrete position.
///
/// Failures block the single open attempt and are absorbed by the engine;
/// they never abort the run.
#[derive(Debug, Clone)]
pub struct RiskValidator {
    config: RiskConfig,
}

impl RiskValidator {
    /// Create a new validator.
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Evaluate an entry decision at the simulated entry fill price.
    ///
    /// The decision must already be clamped. The minimum-notional check runs
    /// against the step-rounded quantity, not the raw request.
    pub fn evaluate(
        &self,
        decision: &OracleDecision,
        capital: f64,
        entry_price: f64,
        entry_time: i64,
    ) -> Result<Position, RiskError> {
        let side = match decision.action {
            OracleAction::Buy => Side::Long,
            OracleAction::Sell => Side::Short,
            other => {
                return Err(RiskError::InvalidDecision(format!(
                    "{} is not an entry action",
                    other
                )))
            }
        };

        if decision.confidence < self.config.min_confidence {
            return Err(RiskError::InvalidDecision(format!(
                "confidence {:.1} below minimum {:.1}",
                decision.confidence, self.config.min_confidence
            )));
        }

        if entry_price <= 0.0 {
            return Err(RiskError::InvalidDecision(format!(
                "non-positive entry price {}",
                entry_price
            )));
        }

        let size_pct = decision.position_size.unwrap_or(self.config.default_size_pct);
        let leverage = decision.leverage.unwrap_or(self.config.default_leverage);
        let stop_pct = decision.stop_loss.unwrap_or(self.config.default_stop_pct);
        let take_pct = decision.take_profit.unwrap_or(self.config.default_take_pct);

        let margin = capital * size_pct / 100.0;
        let quantity = self.round_to_step(margin / entry_price);
        if quantity <= 0.0 {
            return Err(RiskError::ZeroQuantity {
                step: self.config.qty_step,
            });
        }

        let notional = quantity * leverage * entry_price;
        if notional < self.config.min_notional {
            return Err(RiskError::NotionalBelowMinimum {
                notional,
                minimum: self.config.min_notional,
            });
        }

        let (stop_loss, take_profit) = match side {
            Side::Long => (
                entry_price * (1.0 - stop_pct / 100.0),
                entry_price * (1.0 + take_pct / 100.0),
            ),
            Side::Short => (
                entry_price * (1.0 + stop_pct / 100.0),
                entry_price * (1.0 - take_pct / 100.0),
            ),
        };

        Ok(Position {
            side,
            entry_price,
            entry_time,
            quantity,
            leverage,
            stop_loss,
            take_profit,
        })
    }

    fn round_to_step(&self, quantity: f64) -> f64 {
        let step = self.config.qty_step;
        if step <= 0.0 {
            return quantity;
        }
        (quantity / step).floor() * step
    }
}
