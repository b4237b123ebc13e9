//! CSV candle loader

use super::SeriesLoader;
use crate::series::{Candle, Series, TimeInterval, TimeSeries};
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

fn default_time_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

/// Column mapping for one CSV layout: the zero-based index of each candle
/// field, plus the timestamp format.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvSchema {
    pub time: usize,
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default)]
    pub has_headers: bool,
}

/// Loads candles from a delimited file and infers the series interval from
/// the spacing of the first two bars.
pub struct CsvLoader {
    path: PathBuf,
    schema: CsvSchema,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>, schema: CsvSchema) -> Self {
        Self { path: path.into(), schema }
    }

    fn parse_candle(&self, record: &csv::StringRecord, row: usize) -> anyhow::Result<Candle> {
        let field = |index: usize| {
            record
                .get(index)
                .with_context(|| format!("row {row}: missing column {index}"))
        };

        let time = NaiveDateTime::parse_from_str(field(self.schema.time)?, &self.schema.time_format)
            .with_context(|| format!("row {row}: unparseable timestamp"))?
            .and_utc();
        let price = |index: usize| -> anyhow::Result<Decimal> {
            field(index)?
                .parse::<Decimal>()
                .with_context(|| format!("row {row}: unparseable price in column {index}"))
        };

        Ok(Candle::new(
            price(self.schema.open)?,
            price(self.schema.high)?,
            price(self.schema.low)?,
            price(self.schema.close)?,
            time,
        ))
    }
}

impl SeriesLoader for CsvLoader {
    fn load(&self) -> anyhow::Result<TimeSeries<Candle>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.schema.has_headers)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut candles = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.iter().all(|f| f.is_empty()) {
                continue;
            }
            candles.push(self.parse_candle(&record, row)?);
        }

        let series = Series::new(candles)?;
        let interval = match (series.points().first(), series.points().get(1)) {
            (Some(first), Some(second)) => {
                TimeInterval::seconds((second.time - first.time).num_seconds())
            }
            _ => bail!("{}: need at least two rows to infer the sampling interval", self.path.display()),
        };

        Ok(TimeSeries::new(series, interval))
    }
}
