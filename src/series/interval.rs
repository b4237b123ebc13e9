//! Sampling intervals

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A sampling period: magnitude plus unit.
///
/// Doubles as the nominal spacing of a [`TimeSeries`](super::TimeSeries) and
/// as a resampling target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimeInterval {
    pub amount: i64,
    pub unit: IntervalUnit,
}

/// Unit of a [`TimeInterval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl IntervalUnit {
    const fn as_seconds(self) -> i64 {
        match self {
            IntervalUnit::Seconds => 1,
            IntervalUnit::Minutes => 60,
            IntervalUnit::Hours => 3_600,
            IntervalUnit::Days => 86_400,
            IntervalUnit::Weeks => 604_800,
        }
    }
}

impl TimeInterval {
    pub const fn seconds(amount: i64) -> Self {
        Self { amount, unit: IntervalUnit::Seconds }
    }

    pub const fn minutes(amount: i64) -> Self {
        Self { amount, unit: IntervalUnit::Minutes }
    }

    pub const fn hours(amount: i64) -> Self {
        Self { amount, unit: IntervalUnit::Hours }
    }

    pub const fn days(amount: i64) -> Self {
        Self { amount, unit: IntervalUnit::Days }
    }

    pub const fn weeks(amount: i64) -> Self {
        Self { amount, unit: IntervalUnit::Weeks }
    }

    pub const fn as_seconds(&self) -> i64 {
        self.amount * self.unit.as_seconds()
    }

    /// Floor `time` to the start of the bucket this interval places it in.
    pub fn align(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        let step = self.as_seconds();
        datetime_from_secs(time.timestamp().div_euclid(step) * step)
    }
}

/// Epoch seconds back to a UTC timestamp. All callers produce values derived
/// from existing in-range timestamps.
pub(crate) fn datetime_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("timestamp out of range")
}
