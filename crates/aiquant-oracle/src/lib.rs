//! Decision-oracle adapters.
//!
//! The engine consumes any [`aiquant_core::traits::DecisionOracle`]; this
//! crate provides the HTTP adapter for live oracles, a deterministic
//! scripted stub for tests and dry runs, and the explicit rate-limiter and
//! backoff state objects a driver wires in per run.

mod backoff;
mod http;
mod limiter;
mod scripted;

pub use backoff::Backoff;
pub use http::{HttpOracle, JsonProtocol, OracleProtocol};
pub use limiter::{RateLimiter, ThrottledOracle};
pub use scripted::ScriptedOracle;
