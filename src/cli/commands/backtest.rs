//! Backtest command implementation.

use anyhow::{Context, Result};
use aiquant_backtest::BacktestEngine;
use aiquant_config::{load_config, AppConfig};
use aiquant_core::traits::DecisionOracle;
use aiquant_core::types::Timeframe;
use aiquant_data::load_csv;
use aiquant_oracle::{HttpOracle, ScriptedOracle, ThrottledOracle};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::BacktestArgs;

pub async fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    let mut config = if config_path.exists() {
        load_config(config_path).context("Failed to load configuration")?
    } else {
        AppConfig::default()
    };

    // CLI arguments override the config file
    if let Some(symbol) = &args.symbol {
        config.backtest.symbol = symbol.clone();
    }
    if let Some(timeframe) = &args.timeframe {
        config.backtest.timeframe = timeframe
            .parse::<Timeframe>()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
    }
    if let Some(capital) = args.capital {
        config.backtest.initial_capital = capital;
    }

    let data_path = args
        .data
        .to_str()
        .context("Data path is not valid UTF-8")?;
    let bars = load_csv(data_path)
        .with_context(|| format!("Failed to load bar data from '{}'", args.data.display()))?;
    info!(bars = bars.len(), path = %args.data.display(), "loaded bar data");

    let oracle: Box<dyn DecisionOracle> = if args.dry_run {
        Box::new(ScriptedOracle::new())
    } else {
        let mut http = HttpOracle::new(
            config.oracle.endpoint.clone(),
            Duration::from_millis(config.oracle.timeout_ms),
        );
        match std::env::var(&config.oracle.api_key_env) {
            Ok(key) => http = http.with_api_key(key),
            Err(_) => warn!(
                var = %config.oracle.api_key_env,
                "oracle API key not set, sending unauthenticated requests"
            ),
        }
        Box::new(ThrottledOracle::new(
            http,
            Duration::from_millis(config.oracle.min_interval_ms),
        ))
    };

    let engine = BacktestEngine::new(config.backtest.clone());

    // Ctrl-C stops the replay at the next bar boundary
    let cancel = engine.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let report = engine.run(oracle.as_ref(), &bars).await?;

    match args.output.as_str() {
        "json" => println!("{}", report.to_json()?),
        "markdown" => println!("{}", report.to_markdown()),
        _ => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)?;
        info!(path = %save_path.display(), "results saved");
    }

    Ok(())
}
