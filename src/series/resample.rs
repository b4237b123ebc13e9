//! Interval-tagged series and resampling

use super::interval::{datetime_from_secs, TimeInterval};
use super::{Series, TimePoint};
use crate::error::BacktestError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A [`Series`] paired with its nominal sampling interval.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<P: TimePoint> {
    series: Series<P>,
    interval: TimeInterval,
}

impl<P: TimePoint> TimeSeries<P> {
    pub fn new(series: Series<P>, interval: TimeInterval) -> Self {
        Self { series, interval }
    }

    pub fn series(&self) -> &Series<P> {
        &self.series
    }

    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    /// Inclusive sub-range, keeping the interval tag.
    pub fn find(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> TimeSeries<P> {
        TimeSeries::new(self.series.find(start, end), self.interval)
    }

    /// The `n` points strictly preceding `anchor`, keeping the interval tag.
    pub fn window(&self, anchor: DateTime<Utc>, n: usize) -> Result<TimeSeries<P>, BacktestError> {
        Ok(TimeSeries::new(self.series.window(anchor, n)?, self.interval))
    }

    /// Regroup the series onto a coarser interval.
    ///
    /// Points are bucketed by `floor(epoch_secs / target_secs)`; `merge`
    /// collapses each bucket into a single point, which is re-keyed to the
    /// bucket's aligned timestamp. Resampling to the same interval is the
    /// identity; resampling to a finer interval fails.
    pub fn resample<F>(&self, target: TimeInterval, merge: F) -> Result<TimeSeries<P>, BacktestError>
    where
        F: Fn(DateTime<Utc>, &[P]) -> P,
    {
        let source_secs = self.interval.as_seconds();
        let target_secs = target.as_seconds();
        if target_secs < source_secs {
            return Err(BacktestError::IllegalResample { source_secs, target_secs });
        }
        if target_secs == source_secs {
            return Ok(self.clone());
        }

        let mut buckets: BTreeMap<i64, Vec<P>> = BTreeMap::new();
        for point in self.series.iter() {
            let bucket = point.time().timestamp().div_euclid(target_secs);
            buckets.entry(bucket).or_default().push(point.clone());
        }

        // Bucket keys are unique and ascending, so the merged points are too.
        let points = buckets
            .into_iter()
            .map(|(bucket, group)| merge(datetime_from_secs(bucket * target_secs), &group))
            .collect();

        Ok(TimeSeries::new(Series::from_sorted(points), target))
    }
}

/// Bucket merge that keeps the chronologically last point, re-keyed to the
/// bucket's aligned timestamp.
pub fn merge_last<P: TimePoint>(time: DateTime<Utc>, group: &[P]) -> P {
    group[group.len() - 1].with_time(time)
}
