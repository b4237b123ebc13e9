//! Linear regression fitting

use super::TrendPredictor;
use crate::series::TimePoint;
use chrono::{DateTime, Utc};

/// Ordinary least squares over (epoch seconds, value) pairs.
///
/// Fitting fewer than two points yields NaN slope and intercept, which read
/// as neither rising nor falling.
#[derive(Debug, Clone, Copy)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
}

impl LinearRegression {
    pub fn fit<P: TimePoint>(points: &[P]) -> Self {
        if points.len() < 2 {
            return Self { slope: f64::NAN, intercept: f64::NAN };
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.x()).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.y()).sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for point in points {
            let dx = point.x() - mean_x;
            covariance += dx * (point.y() - mean_y);
            variance += dx * dx;
        }

        let slope = covariance / variance;
        Self { slope, intercept: mean_y - slope * mean_x }
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }
}

impl TrendPredictor for LinearRegression {
    fn predict(&self, time: DateTime<Utc>) -> f64 {
        self.intercept + self.slope * time.timestamp() as f64
    }

    fn is_rising(&self) -> bool {
        self.slope > 0.0
    }

    fn is_falling(&self) -> bool {
        self.slope < 0.0
    }
}

/// Two regressions at different horizons.
///
/// Signals a trend only when the short window both points in that direction
/// and moves faster than the long window, filtering moves that merely track
/// the prevailing drift.
#[derive(Debug, Clone, Copy)]
pub struct DualRegression {
    short: LinearRegression,
    long: LinearRegression,
}

impl DualRegression {
    pub fn fit<P: TimePoint>(short: &[P], long: &[P]) -> Self {
        Self { short: LinearRegression::fit(short), long: LinearRegression::fit(long) }
    }
}

impl TrendPredictor for DualRegression {
    fn predict(&self, time: DateTime<Utc>) -> f64 {
        self.short.predict(time)
    }

    fn is_rising(&self) -> bool {
        self.short.slope() > 0.0 && self.short.slope() > self.long.slope()
    }

    fn is_falling(&self) -> bool {
        self.short.slope() < 0.0 && self.short.slope() < self.long.slope()
    }
}
