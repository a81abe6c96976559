//! Render a previously saved backtest report.

use anyhow::{Context, Result};
use aiquant_backtest::BacktestReport;

use crate::cli::ReportArgs;

pub async fn run(args: ReportArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read '{}'", args.input.display()))?;
    let report = BacktestReport::from_json(&json).context("Failed to parse report")?;

    match args.output.as_str() {
        "markdown" => println!("{}", report.to_markdown()),
        "json" => println!("{}", report.to_json()?),
        _ => println!("{}", report.summary()),
    }

    Ok(())
}
