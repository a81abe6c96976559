//! Validate configuration command.

use anyhow::Result;
use aiquant_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Oracle endpoint: {}", config.oracle.endpoint);
            println!("Oracle timeout: {}ms", config.oracle.timeout_ms);
            println!("Symbol: {}", config.backtest.symbol);
            println!("Timeframe: {}", config.backtest.timeframe);
            println!("Initial capital: ${}", config.backtest.initial_capital);
            println!("Min confidence: {}", config.backtest.risk.min_confidence);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
