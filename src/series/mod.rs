//! Time-indexed series container
//!
//! An immutable, ascending-sorted, unique-keyed sequence of timestamped
//! points, with binary-searched range queries, bounded backward windows, and
//! interval resampling. Foundation for everything the engine does.

mod interval;
mod point;
mod resample;

pub use interval::{IntervalUnit, TimeInterval};
pub use point::{Candle, DataPoint, TimePoint};
pub use resample::{merge_last, TimeSeries};

use crate::error::BacktestError;
use chrono::{DateTime, Utc};

/// Immutable, time-sorted sequence of points with unique timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<P: TimePoint> {
    points: Vec<P>,
}

impl<P: TimePoint> Series<P> {
    /// Sort `points` by timestamp and reject duplicates.
    pub fn new(mut points: Vec<P>) -> Result<Self, BacktestError> {
        points.sort_by_key(|p| p.time());
        for pair in points.windows(2) {
            if pair[0].time() == pair[1].time() {
                return Err(BacktestError::DuplicateTimestamp(pair[0].time()));
            }
        }
        Ok(Self { points })
    }

    /// Caller guarantees `points` is already sorted and unique.
    pub(crate) fn from_sorted(points: Vec<P>) -> Self {
        Self { points }
    }

    /// Inclusive sub-range `[start, end]`. Absent bounds default to the
    /// series extremes.
    pub fn find(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Series<P> {
        let lo = start.map_or(0, |t| self.points.partition_point(|p| p.time() < t));
        let hi = end.map_or(self.points.len(), |t| self.points.partition_point(|p| p.time() <= t));
        if lo >= hi {
            return Series::from_sorted(Vec::new());
        }
        Series::from_sorted(self.points[lo..hi].to_vec())
    }

    /// Index of the point keyed exactly at `time`.
    pub fn index_of(&self, time: DateTime<Utc>) -> Option<usize> {
        self.points.binary_search_by(|p| p.time().cmp(&time)).ok()
    }

    /// The `n` points strictly preceding `anchor`, in ascending order.
    ///
    /// The anchor itself is excluded. Fails if the anchor is not a point of
    /// the series, or if fewer than `n` predecessors exist.
    pub fn window(&self, anchor: DateTime<Utc>, n: usize) -> Result<Series<P>, BacktestError> {
        let index = self
            .index_of(anchor)
            .ok_or(BacktestError::AnchorNotFound(anchor))?;
        if index < n {
            return Err(BacktestError::InsufficientLookback { requested: n, available: index });
        }
        Ok(Series::from_sorted(self.points[index - n..index].to_vec()))
    }

    /// The point with the highest value in the inclusive range.
    pub fn highest(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<P> {
        self.find(start, end)
            .points
            .into_iter()
            .max_by(|a, b| a.value().cmp(&b.value()))
    }

    /// The point with the lowest value in the inclusive range.
    pub fn lowest(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<P> {
        self.find(start, end)
            .points
            .into_iter()
            .min_by(|a, b| a.value().cmp(&b.value()))
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&P> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&P> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
