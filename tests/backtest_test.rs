//! End-to-end backtest tests
//!
//! Drives the full pipeline: CSV loading, strategy dispatch, accounting,
//! and settlement, against a hand-checked price path.

use rust_decimal_macros::dec;
use std::io::Write;
use tradesim::config::Config;
use tradesim::engine::{Backtest, DecisionReason, FuturesFee, Parameters};
use tradesim::loader::{CsvLoader, CsvSchema, SeriesLoader};
use tradesim::series::TimeInterval;
use tradesim::strategy::{AverageParams, AverageStrategy};

/// 18 one-minute bars: a flat warmup, an accelerating rise that triggers an
/// entry and one add, a sharp drop that flips the entry signal, and a final
/// slide that opens a short.
const PRICE_PATH: &str = "\
1970-01-01 00:01,100\n\
1970-01-01 00:02,100\n\
1970-01-01 00:03,100\n\
1970-01-01 00:04,100\n\
1970-01-01 00:05,100\n\
1970-01-01 00:06,100\n\
1970-01-01 00:07,100\n\
1970-01-01 00:08,100\n\
1970-01-01 00:09,100\n\
1970-01-01 00:10,100\n\
1970-01-01 00:11,102\n\
1970-01-01 00:12,104\n\
1970-01-01 00:13,106\n\
1970-01-01 00:14,108\n\
1970-01-01 00:15,110\n\
1970-01-01 00:16,112\n\
1970-01-01 00:17,105\n\
1970-01-01 00:18,100\n";

fn write_price_csv() -> tempfile::NamedTempFile {
    // flat bars: every OHLC column reads the same close column
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PRICE_PATH.as_bytes()).unwrap();
    file
}

fn schema() -> CsvSchema {
    CsvSchema {
        time: 0,
        open: 1,
        high: 1,
        low: 1,
        close: 1,
        time_format: "%Y-%m-%d %H:%M".to_string(),
        has_headers: false,
    }
}

fn strategy_params() -> AverageParams {
    AverageParams {
        avg_interval: TimeInterval::minutes(5),
        trend_interval: TimeInterval::minutes(3),
        enter_volume: dec!(5),
        add_step: dec!(2),
        max_adds: 1,
        stop_profit: dec!(3),
        stop_loss: dec!(4),
    }
}

fn run_params() -> Parameters {
    Parameters {
        initial_funds: dec!(1_000_000),
        fee: Box::new(FuturesFee::new(dec!(10), dec!(0.02))),
        overspend_rate: dec!(0),
        fail_on_overspend: true,
        start: None,
        end: None,
    }
}

#[test]
fn test_average_strategy_full_run() {
    let file = write_price_csv();
    let data = CsvLoader::new(file.path(), schema()).load().unwrap();
    assert_eq!(data.interval(), TimeInterval::minutes(1));

    let backtest = Backtest::new(AverageStrategy::new(strategy_params()), run_params());
    let report = backtest.run(data).unwrap();

    // entry long on the breakout, one add, flip-flattened on the drop,
    // then a fresh short entry on the slide
    let fills: Vec<_> = report
        .transactions
        .iter()
        .map(|t| (t.volume, t.price, t.reason))
        .collect();
    assert_eq!(
        fills,
        vec![
            (dec!(5), dec!(102), DecisionReason::Entry),
            (dec!(5), dec!(104), DecisionReason::Add),
            (dec!(-10), dec!(105), DecisionReason::StopLoss),
            (dec!(-5), dec!(100), DecisionReason::Entry),
        ]
    );

    // one closed round trip: (105*10 - 102*5 - 104*5) * lever 10 = 200
    assert_eq!(report.settlements.len(), 1);
    assert_eq!(report.settlements[0].profit, dec!(200));
    assert_eq!(report.profit, dec!(200.00));

    // transactions stay in replay order
    assert!(report.transactions.windows(2).all(|w| w[0].time < w[1].time));
}

#[test]
fn test_settlement_matches_negated_notional_over_closed_prefix() {
    let file = write_price_csv();
    let data = CsvLoader::new(file.path(), schema()).load().unwrap();
    let report = Backtest::new(AverageStrategy::new(strategy_params()), run_params())
        .run(data)
        .unwrap();

    // up to the flattening fill the log is a closed round trip, so settled
    // profit equals the negated notional sum over that prefix, levered
    let closed_prefix = &report.transactions[..3];
    let notional: rust_decimal::Decimal = closed_prefix.iter().map(|t| t.price * t.volume).sum();
    assert_eq!(report.settlements[0].profit, -notional * dec!(10));
}

#[test]
fn test_config_driven_run_matches_direct_run() {
    let file = write_price_csv();
    let config_toml = format!(
        r#"
        [backtest]
        initial_funds = 1000000
        fail_on_overspend = true

        [fee]
        multiplier = 10
        deposit_pct = 0.02

        [data]
        path = "{path}"
        schema = {{ time = 0, open = 1, high = 1, low = 1, close = 1 }}

        [strategy]
        kind = "average"
        avg_interval = {{ amount = 5, unit = "minutes" }}
        trend_interval = {{ amount = 3, unit = "minutes" }}
        enter_volume = 5
        add_step = 2
        max_adds = 1
        stop_profit = 3
        stop_loss = 4
    "#,
        path = file.path().display()
    );
    let config: Config = toml::from_str(&config_toml).unwrap();

    let data = CsvLoader::new(config.data.path.clone(), config.data.schema.clone())
        .load()
        .unwrap();
    let report = Backtest::new(config.strategy.build(), config.parameters())
        .run(data)
        .unwrap();

    assert_eq!(report.profit, dec!(200.00));
    assert_eq!(report.transactions.len(), 4);
}

#[test]
fn test_run_window_excludes_outside_bars() {
    let file = write_price_csv();
    let data = CsvLoader::new(file.path(), schema()).load().unwrap();

    // end the run before the drop: the long position never closes
    let params = Parameters {
        end: Some(chrono::DateTime::parse_from_rfc3339("1970-01-01T00:16:00Z").unwrap().into()),
        ..run_params()
    };
    let report = Backtest::new(AverageStrategy::new(strategy_params()), params)
        .run(data)
        .unwrap();

    assert_eq!(report.transactions.len(), 2);
    assert!(report.settlements.is_empty());
    assert_eq!(report.profit, dec!(0));
}
