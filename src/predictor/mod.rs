//! Trend predictors
//!
//! Least-squares trend fitting over timestamped points. Strategies use these
//! to gate entries on the direction of recent price or indicator movement.

mod regression;

pub use regression::{DualRegression, LinearRegression};

use chrono::{DateTime, Utc};

/// Directional trend read from fitted data.
pub trait TrendPredictor {
    /// Extrapolated value at `time`.
    fn predict(&self, time: DateTime<Utc>) -> f64;

    fn is_rising(&self) -> bool;

    fn is_falling(&self) -> bool;
}
