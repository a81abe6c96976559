//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LoggingConfig, OracleConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables use the `AIQUANT` prefix with `__` separators,
/// e.g. `AIQUANT__BACKTEST__INITIAL_CAPITAL=500`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("AIQUANT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
