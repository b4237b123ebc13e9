//! Interval-resampled moving average

use crate::error::BacktestError;
use crate::series::{merge_last, Candle, DataPoint, TimeInterval, TimeSeries};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rolling mean over an interval-resampled view of a source series.
///
/// The source series is resampled once to the MA's own interval. Each
/// [`update`](MovingAverage::update) then averages the `window - 1`
/// resampled buckets preceding the live bar's bucket together with the live
/// close, so the newest (possibly partial) bucket always reflects the bar
/// being processed.
pub struct MovingAverage {
    window: usize,
    interval: TimeInterval,
    resampled: TimeSeries<Candle>,
    points: Vec<DataPoint>,
}

impl MovingAverage {
    /// Resample `source` to `interval` and start with an empty point list.
    pub fn over(
        source: &TimeSeries<Candle>,
        window: usize,
        interval: TimeInterval,
    ) -> Result<Self, BacktestError> {
        let resampled = source.resample(interval, merge_last)?;
        Ok(Self { window, interval, resampled, points: Vec::new() })
    }

    /// Fold `bar` into the average and record the resulting point, keyed by
    /// the bar's own timestamp.
    ///
    /// Fails if the bar's bucket is absent from the resampled series or the
    /// series is too short to cover the window.
    pub fn update(&mut self, bar: &Candle) -> Result<(), BacktestError> {
        let anchor = self.interval.align(bar.time);
        let history = self.resampled.series().window(anchor, self.window.saturating_sub(1))?;

        let mut sum: Decimal = history.iter().map(|c| c.close).sum();
        sum += bar.close;
        let count = Decimal::from(history.len() as u64 + 1);
        let value = (sum / count).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        self.points.push(DataPoint::new(value, bar.time));
        Ok(())
    }

    pub fn last(&self) -> Option<&DataPoint> {
        self.points.last()
    }

    /// The most recent `n` computed points, ascending.
    pub fn recent(&self, n: usize) -> Result<&[DataPoint], BacktestError> {
        if self.points.len() < n {
            return Err(BacktestError::InsufficientLookback {
                requested: n,
                available: self.points.len(),
            });
        }
        Ok(&self.points[self.points.len() - n..])
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }
}
