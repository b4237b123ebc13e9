//! Dual moving-average trend following

use super::Strategy;
use crate::engine::{Decision, DecisionReason, Side, TradingContext};
use crate::error::BacktestError;
use crate::indicator::MovingAverage;
use crate::predictor::{LinearRegression, TrendPredictor};
use crate::series::{Candle, TimeInterval};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Parameters for [`MaTrendStrategy`].
#[derive(Debug, Clone, Deserialize)]
pub struct MaTrendParams {
    /// Slow moving average: window length in `slow_interval` buckets.
    pub slow_window: usize,
    pub slow_interval: TimeInterval,
    /// Fast moving average: window length in `fast_interval` buckets.
    pub fast_window: usize,
    pub fast_interval: TimeInterval,
    /// Number of recent MA points the trend regression is fitted over.
    pub trend_points: usize,
    /// Contracts per entry.
    pub enter_volume: Decimal,
    /// Retrace from the best close since entry that flattens the position.
    pub stop_profit: Decimal,
    /// Adverse move from the last same-side fill that flattens the position.
    pub stop_loss: Decimal,
}

/// Trend follower on two resampled moving averages.
///
/// Goes long while the slow MA regression rises; goes short when the fast MA
/// falls and price breaks below the fast MA line. Exits on stop-loss,
/// MA-line break, or stop-profit retrace.
pub struct MaTrendStrategy {
    params: MaTrendParams,
    slow: Option<MovingAverage>,
    fast: Option<MovingAverage>,
}

impl MaTrendStrategy {
    pub fn new(params: MaTrendParams) -> Self {
        Self { params, slow: None, fast: None }
    }

    fn slow(&self) -> Result<&MovingAverage, BacktestError> {
        self.slow
            .as_ref()
            .ok_or(BacktestError::InconsistentState("strategy used before init"))
    }

    fn fast(&self) -> Result<&MovingAverage, BacktestError> {
        self.fast
            .as_ref()
            .ok_or(BacktestError::InconsistentState("strategy used before init"))
    }

    /// Latest fast MA value; the comparison line for breaks.
    fn fast_line(&self) -> Result<Decimal, BacktestError> {
        Ok(self
            .fast()?
            .last()
            .ok_or(BacktestError::InconsistentState("fast moving average has no points"))?
            .value)
    }
}

impl Strategy for MaTrendStrategy {
    fn init(&mut self, ctx: &TradingContext) -> Result<(), BacktestError> {
        self.slow = Some(MovingAverage::over(ctx.data(), self.params.slow_window, self.params.slow_interval)?);
        self.fast = Some(MovingAverage::over(ctx.data(), self.params.fast_window, self.params.fast_interval)?);
        Ok(())
    }

    fn preprocess(&mut self, bar: &Candle, _ctx: &TradingContext) -> Result<(), BacktestError> {
        self.slow
            .as_mut()
            .ok_or(BacktestError::InconsistentState("strategy used before init"))?
            .update(bar)?;
        self.fast
            .as_mut()
            .ok_or(BacktestError::InconsistentState("strategy used before init"))?
            .update(bar)?;
        Ok(())
    }

    fn entry_decision(&mut self, bar: &Candle, _ctx: &TradingContext) -> Result<Decision, BacktestError> {
        let slow = self.slow()?;
        // not enough MA points accumulated yet to read a trend
        if slow.points().len() < self.params.trend_points {
            return Ok(Decision::Hold);
        }

        let slow_trend = LinearRegression::fit(slow.recent(self.params.trend_points)?);
        if slow_trend.is_rising() {
            return Ok(Decision::buy(self.params.enter_volume, DecisionReason::Entry));
        }

        let fast = self.fast()?;
        let fast_trend = LinearRegression::fit(fast.recent(self.params.trend_points)?);
        if fast_trend.is_falling() && bar.close < self.fast_line()? {
            return Ok(Decision::sell(self.params.enter_volume, DecisionReason::Entry));
        }

        Ok(Decision::Hold)
    }

    fn long_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        let last_buy = ctx
            .last_transaction(Side::Buy)
            .ok_or(BacktestError::InconsistentState("long position without a recorded buy"))?;

        // adverse move or a break below the fast MA line
        if last_buy.price - bar.close >= self.params.stop_loss || bar.close < self.fast_line()? {
            return Ok(Decision::sell(ctx.held_volume(), DecisionReason::StopLoss));
        }

        let entry = ctx
            .entry_point()
            .ok_or(BacktestError::InconsistentState("long position without an entry point"))?;
        let highest = ctx
            .highest_close(entry.time, bar.time)
            .ok_or(BacktestError::InconsistentState("no bars between entry and current bar"))?;
        if highest.close - bar.close >= self.params.stop_profit {
            return Ok(Decision::sell(ctx.held_volume(), DecisionReason::StopProfit));
        }

        Ok(Decision::Hold)
    }

    fn short_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        let last_sell = ctx
            .last_transaction(Side::Sell)
            .ok_or(BacktestError::InconsistentState("short position without a recorded sell"))?;

        // adverse move or a break above the fast MA line
        if bar.close - last_sell.price >= self.params.stop_loss || bar.close > self.fast_line()? {
            return Ok(Decision::buy(ctx.held_volume(), DecisionReason::StopLoss));
        }

        let entry = ctx
            .entry_point()
            .ok_or(BacktestError::InconsistentState("short position without an entry point"))?;
        let lowest = ctx
            .lowest_close(entry.time, bar.time)
            .ok_or(BacktestError::InconsistentState("no bars between entry and current bar"))?;
        if bar.close - lowest.close >= self.params.stop_profit {
            return Ok(Decision::buy(ctx.held_volume(), DecisionReason::StopProfit));
        }

        Ok(Decision::Hold)
    }
}
