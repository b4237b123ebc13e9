//! Price indicators

mod moving_average;

pub use moving_average::MovingAverage;

use crate::series::Candle;
use rust_decimal::{Decimal, RoundingStrategy};

/// Mean of candle closes, rounded to 2 decimal places half-up.
///
/// Returns `None` for an empty input.
pub fn mean_close<'a, I>(candles: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Candle>,
{
    let mut sum = Decimal::ZERO;
    let mut count = 0u64;
    for candle in candles {
        sum += candle.close;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some((sum / Decimal::from(count)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
