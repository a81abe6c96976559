//! Error types for the engine.

use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Risk check failed: {0}")]
    Risk(#[from] RiskError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Decision-oracle failures.
///
/// These are always non-fatal for a backtest run: the orchestrator converts
/// them into a HOLD decision with the error text as reasoning.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("API error: {0}")]
    Api(String),
}

/// Market-data precondition failures.
///
/// Unlike oracle errors these are fatal and surface before any bar is
/// processed.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Bar series is empty")]
    EmptySeries,

    #[error("Insufficient history: need {required} bars, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Bars out of order at index {index}")]
    UnorderedTimestamps { index: usize },

    #[error("Duplicate bar timestamp: {timestamp}")]
    DuplicateTimestamp { timestamp: i64 },

    #[error("No data available for the requested input")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Risk-validation failures.
///
/// These block a single position-open attempt and never abort the run.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Notional {notional:.4} below minimum {minimum:.4}")]
    NotionalBelowMinimum { notional: f64, minimum: f64 },

    #[error("Position size rounds to zero at step {step}")]
    ZeroQuantity { step: f64 },

    #[error("Invalid decision for entry: {0}")]
    InvalidDecision(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
