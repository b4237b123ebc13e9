//! Candle series loaders
//!
//! Boundary between raw market data files and the engine's parsed,
//! time-ordered series.

mod csv_loader;

pub use csv_loader::{CsvLoader, CsvSchema};

use crate::series::{Candle, TimeSeries};

/// Source of a fully-parsed candle series.
pub trait SeriesLoader {
    fn load(&self) -> anyhow::Result<TimeSeries<Candle>>;
}
