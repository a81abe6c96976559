//! Exponential backoff state.

use std::time::Duration;

/// Exponential backoff with a delay cap.
///
/// Pure state: callers ask for the next delay and do their own sleeping, so
/// tests can drive retry schedules synchronously without timers. Replaces
/// recursive reconnect-on-close callbacks with an explicit, inspectable
/// retry loop.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    attempt: u32,
}

impl Backoff {
    /// Create a backoff starting at `base` and capped at `max`.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            attempt: 0,
        }
    }

    /// Number of delays handed out since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Get the next delay and advance the attempt counter.
    ///
    /// Delays double each attempt: base, 2x base, 4x base, ... up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let exp = self.attempt.min(16);
        self.attempt += 1;
        let delay = self.base.saturating_mul(1u32 << exp);
        delay.min(self.max)
    }

    /// Reset after a successful call/connection.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
