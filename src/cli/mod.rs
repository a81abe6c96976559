//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aiquant")]
#[command(author, version, about = "AI-oracle driven backtesting engine")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a backtest over a CSV bar series
    Backtest(BacktestArgs),
    /// Render a saved backtest report
    Report(ReportArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Bar data file (CSV)
    #[arg(long)]
    pub data: PathBuf,

    /// Instrument symbol
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Bar timeframe (1m, 5m, 15m, 1h, 4h, 1d)
    #[arg(short, long)]
    pub timeframe: Option<String>,

    /// Initial capital
    #[arg(long)]
    pub capital: Option<f64>,

    /// Use the hold-only scripted oracle instead of the HTTP endpoint
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (text, json, markdown)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save results to file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ReportArgs {
    /// Saved JSON report
    #[arg(long)]
    pub input: PathBuf,

    /// Output format (text, markdown, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}
