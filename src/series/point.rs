//! Timestamped point types

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A timestamped observation that can live in a [`Series`](super::Series).
///
/// The timestamp is the point's identity and ordering key; `value` is the
/// scalar used by extremum lookups and trend fitting.
pub trait TimePoint: Clone {
    fn time(&self) -> DateTime<Utc>;
    fn value(&self) -> Decimal;
    /// The same observation re-keyed to a different timestamp. Used by
    /// resampling to relabel a merged point to its bucket's aligned time.
    fn with_time(&self, time: DateTime<Utc>) -> Self;

    /// Cartesian projection for regression fitting: x = epoch seconds.
    fn x(&self) -> f64 {
        self.time().timestamp() as f64
    }

    /// Cartesian projection for regression fitting: y = value.
    fn y(&self) -> f64 {
        self.value().to_f64().unwrap_or(f64::NAN)
    }
}

/// A bare (value, time) observation, e.g. one moving-average point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub value: Decimal,
    pub time: DateTime<Utc>,
}

impl DataPoint {
    pub fn new(value: Decimal, time: DateTime<Utc>) -> Self {
        Self { value, time }
    }
}

impl TimePoint for DataPoint {
    fn time(&self) -> DateTime<Utc> {
        self.time
    }

    fn value(&self) -> Decimal {
        self.value
    }

    fn with_time(&self, time: DateTime<Utc>) -> Self {
        Self { time, ..*self }
    }
}

/// One OHLC price bar, keyed by its timestamp.
///
/// Two candles with equal timestamps are duplicates and illegal in a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub time: DateTime<Utc>,
}

impl Candle {
    pub fn new(open: Decimal, high: Decimal, low: Decimal, close: Decimal, time: DateTime<Utc>) -> Self {
        Self { open, high, low, close, time }
    }
}

impl TimePoint for Candle {
    fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Fills and indicators work off the close.
    fn value(&self) -> Decimal {
        self.close
    }

    fn with_time(&self, time: DateTime<Utc>) -> Self {
        Self { time, ..self.clone() }
    }
}
