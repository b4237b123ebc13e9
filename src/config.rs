//! Configuration types for tradesim

use crate::engine::{FuturesFee, Parameters};
use crate::loader::CsvSchema;
use crate::strategy::{AverageParams, AverageStrategy, MaTrendParams, MaTrendStrategy, Strategy};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backtest: BacktestConfig,
    pub fee: FeeConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    pub strategy: StrategyConfig,
}

/// Run window and funds configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BacktestConfig {
    pub initial_funds: Decimal,
    /// Fraction of initial funds the surplus may go negative by.
    #[serde(default)]
    pub overspend_rate: Decimal,
    /// Abort the run instead of skipping bars the funds cannot cover.
    #[serde(default)]
    pub fail_on_overspend: bool,
    /// RFC 3339 timestamps; absent bounds default to the series extent.
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Futures fee model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeeConfig {
    /// Contract multiplier; also the leverage applied to settled P&L.
    pub multiplier: Decimal,
    /// Margin deposit as a fraction of contract notional.
    pub deposit_pct: Decimal,
}

/// Candle data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    pub schema: CsvSchema,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

/// Strategy selection plus its parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    Average(AverageParams),
    MaTrend(MaTrendParams),
}

impl StrategyConfig {
    /// Construct the configured strategy behind the dispatch trait.
    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            StrategyConfig::Average(params) => Box::new(AverageStrategy::new(params.clone())),
            StrategyConfig::MaTrend(params) => Box::new(MaTrendStrategy::new(params.clone())),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Engine parameters for this configuration.
    pub fn parameters(&self) -> Parameters {
        Parameters {
            initial_funds: self.backtest.initial_funds,
            fee: Box::new(FuturesFee::new(self.fee.multiplier, self.fee.deposit_pct)),
            overspend_rate: self.backtest.overspend_rate,
            fail_on_overspend: self.backtest.fail_on_overspend,
            start: self.backtest.start,
            end: self.backtest.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const AVERAGE_TOML: &str = r#"
        [backtest]
        initial_funds = 5000000
        overspend_rate = 0.1
        fail_on_overspend = true
        start = "2020-04-10T00:00:00Z"
        end = "2020-05-15T00:00:00Z"

        [fee]
        multiplier = 10000
        deposit_pct = 0.02

        [data]
        path = "./data/bonds_5min.csv"
        schema = { time = 2, open = 3, high = 4, low = 5, close = 6, time_format = "%Y-%m-%d %H:%M" }

        [telemetry]
        log_level = "debug"

        [strategy]
        kind = "average"
        avg_interval = { amount = 10, unit = "days" }
        trend_interval = { amount = 10, unit = "minutes" }
        enter_volume = 5
        add_step = 0.15
        max_adds = 4
        stop_profit = 0.5
        stop_loss = 0.5
    "#;

    #[test]
    fn test_config_deserialize_average_strategy() {
        let config: Config = toml::from_str(AVERAGE_TOML).unwrap();
        assert_eq!(config.backtest.initial_funds, dec!(5000000));
        assert!(config.backtest.fail_on_overspend);
        assert_eq!(config.fee.multiplier, dec!(10000));
        assert_eq!(config.telemetry.log_level, "debug");
        assert!(matches!(config.strategy, StrategyConfig::Average(ref p) if p.max_adds == 4));
    }

    #[test]
    fn test_config_deserialize_ma_trend_strategy() {
        let toml = r#"
            [backtest]
            initial_funds = 1000000

            [fee]
            multiplier = 100
            deposit_pct = 0.05

            [data]
            path = "./data/candles.csv"
            schema = { time = 0, open = 1, high = 2, low = 3, close = 4 }

            [strategy]
            kind = "ma_trend"
            slow_window = 20
            slow_interval = { amount = 1, unit = "days" }
            fast_window = 60
            fast_interval = { amount = 5, unit = "minutes" }
            trend_points = 5
            enter_volume = 10
            stop_profit = 0.5
            stop_loss = 0.5
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(config.strategy, StrategyConfig::MaTrend(ref p) if p.slow_window == 20));
        // defaults applied
        assert_eq!(config.backtest.overspend_rate, dec!(0));
        assert!(!config.backtest.fail_on_overspend);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.data.schema.time_format.contains("%Y"));
    }

    #[test]
    fn test_parameters_wire_through_fee_model() {
        let config: Config = toml::from_str(AVERAGE_TOML).unwrap();
        let params = config.parameters();
        assert_eq!(params.fee.fee_rate(), dec!(200.00));
        assert_eq!(params.fee.lever(), dec!(10000));
        assert!(params.start.is_some());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/tradesim.toml");
        assert!(result.is_err());
    }
}
