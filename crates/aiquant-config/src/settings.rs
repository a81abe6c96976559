//! Configuration structures.

use aiquant_backtest::BacktestConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub backtest: BacktestConfig,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "aiquant".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Decision-oracle endpoint configuration.
///
/// The API key is read from the named environment variable, never from the
/// config file itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub endpoint: String,
    pub api_key_env: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Minimum milliseconds between consecutive calls
    pub min_interval_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/decide".to_string(),
            api_key_env: "AIQUANT_ORACLE_API_KEY".to_string(),
            timeout_ms: 30_000,
            min_interval_ms: 0,
        }
    }
}
