//! Run command implementation

use crate::config::Config;
use crate::engine::Backtest;
use crate::loader::{CsvLoader, SeriesLoader};
use crate::report::ChartReport;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Candle CSV path (overrides the configured data path)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Write the chart-aligned JSON report to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let path = self.data.clone().unwrap_or_else(|| config.data.path.clone());
        tracing::info!(path = %path.display(), "loading candle data");
        let data = CsvLoader::new(path, config.data.schema.clone()).load()?;
        tracing::info!(
            bars = data.series().len(),
            interval_secs = data.interval().as_seconds(),
            "data loaded"
        );

        let backtest = Backtest::new(config.strategy.build(), config.parameters());
        let report = backtest.run(data)?;

        println!("profit: {}", report.profit);
        println!("transactions: {}", report.transactions.len());
        println!("settlements: {}", report.settlements.len());

        if let Some(output) = &self.output {
            let chart = ChartReport::from_run(&report);
            std::fs::write(output, chart.to_json()?)?;
            tracing::info!(path = %output.display(), "chart report written");
        }

        Ok(())
    }
}
