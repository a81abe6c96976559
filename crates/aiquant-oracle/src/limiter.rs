//! Per-run oracle rate limiter.

use aiquant_core::error::OracleError;
use aiquant_core::traits::DecisionOracle;
use aiquant_core::types::{MarketSnapshot, OracleDecision};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval rate limiter.
///
/// Constructed once per run and passed into whatever drives the oracle;
/// there is no process-global limiter state, so unrelated runs (and tests)
/// never interfere with each other.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter enforcing at most one call per `min_interval`.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// How long a call at `now` would have to wait. Pure; used by tests.
    pub fn delay_at(&self, now: Instant) -> Duration {
        match self.last_call {
            Some(last) => {
                let elapsed = now.duration_since(last);
                self.min_interval.saturating_sub(elapsed)
            }
            None => Duration::ZERO,
        }
    }

    /// Record that a call happened at `now`.
    pub fn record(&mut self, now: Instant) {
        self.last_call = Some(now);
    }

    /// Wait until a call is permitted, then record it.
    pub async fn acquire(&mut self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.record(Instant::now());
    }
}

/// A decision oracle throttled by a per-run [`RateLimiter`].
pub struct ThrottledOracle<O> {
    inner: O,
    limiter: Mutex<RateLimiter>,
}

impl<O: DecisionOracle> ThrottledOracle<O> {
    /// Wrap an oracle with a minimum interval between calls.
    pub fn new(inner: O, min_interval: Duration) -> Self {
        Self {
            inner,
            limiter: Mutex::new(RateLimiter::new(min_interval)),
        }
    }
}

#[async_trait]
impl<O: DecisionOracle> DecisionOracle for ThrottledOracle<O> {
    async fn decide(&self, snapshot: &MarketSnapshot) -> Result<OracleDecision, OracleError> {
        self.limiter.lock().await.acquire().await;
        self.inner.decide(snapshot).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
