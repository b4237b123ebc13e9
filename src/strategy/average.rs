//! Average-reversion entry with dual-regression trend confirmation

use super::Strategy;
use crate::engine::{Decision, DecisionReason, Side, TradingContext};
use crate::error::BacktestError;
use crate::indicator;
use crate::predictor::{DualRegression, TrendPredictor};
use crate::series::{Candle, TimeInterval};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Parameters for [`AverageStrategy`].
#[derive(Debug, Clone, Deserialize)]
pub struct AverageParams {
    /// Lookback used for the reference mean of closes.
    pub avg_interval: TimeInterval,
    /// Short regression window; the long window is ten times this.
    pub trend_interval: TimeInterval,
    /// Contracts per entry or add.
    pub enter_volume: Decimal,
    /// Favorable move from the last same-side fill required per add.
    pub add_step: Decimal,
    /// Cap on adds per position.
    pub max_adds: u32,
    /// Retrace from the best close since entry that flattens the position.
    pub stop_profit: Decimal,
    /// Adverse move from the last same-side fill that flattens the position.
    pub stop_loss: Decimal,
}

/// Opens with the trend when price detaches from its recent mean, pyramids
/// on continued favorable movement, and exits on stop-loss, stop-profit
/// retrace, or a flip of the entry signal.
pub struct AverageStrategy {
    params: AverageParams,
    adds: u32,
}

impl AverageStrategy {
    pub fn new(params: AverageParams) -> Self {
        Self { params, adds: 0 }
    }

    fn flatten(&mut self, ctx: &TradingContext, reason: DecisionReason, exit: Side) -> Decision {
        self.adds = 0;
        match exit {
            Side::Sell => Decision::sell(ctx.held_volume(), reason),
            Side::Buy => Decision::buy(ctx.held_volume(), reason),
        }
    }
}

impl Strategy for AverageStrategy {
    fn preprocess(&mut self, _bar: &Candle, _ctx: &TradingContext) -> Result<(), BacktestError> {
        Ok(())
    }

    fn entry_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        let data = ctx.data();

        // reference mean runs up to the bar before this one
        let avg_start = bar.time - Duration::seconds(self.params.avg_interval.as_seconds());
        let avg_end = bar.time - Duration::seconds(data.interval().as_seconds());
        let history = data.series().find(Some(avg_start), Some(avg_end));
        let Some(average) = indicator::mean_close(history.iter()) else {
            return Ok(Decision::Hold);
        };

        // trend confirmation includes the current bar
        let trend_secs = self.params.trend_interval.as_seconds();
        let short = data.series().find(Some(bar.time - Duration::seconds(trend_secs)), Some(bar.time));
        let long = data
            .series()
            .find(Some(bar.time - Duration::seconds(trend_secs * 10)), Some(bar.time));
        let trend = DualRegression::fit(short.points(), long.points());

        if bar.close > average && trend.is_rising() {
            return Ok(Decision::buy(self.params.enter_volume, DecisionReason::Entry));
        }
        if bar.close < average && trend.is_falling() {
            return Ok(Decision::sell(self.params.enter_volume, DecisionReason::Entry));
        }
        Ok(Decision::Hold)
    }

    fn long_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        // entry signal flipped short: abandon the long position
        if self.entry_decision(bar, ctx)?.is_sell() {
            return Ok(self.flatten(ctx, DecisionReason::StopLoss, Side::Sell));
        }

        let last_buy = ctx
            .last_transaction(Side::Buy)
            .ok_or(BacktestError::InconsistentState("long position without a recorded buy"))?;

        if bar.close - last_buy.price >= self.params.add_step && self.adds < self.params.max_adds {
            self.adds += 1;
            return Ok(Decision::buy(self.params.enter_volume, DecisionReason::Add));
        }

        if last_buy.price - bar.close >= self.params.stop_loss {
            return Ok(self.flatten(ctx, DecisionReason::StopLoss, Side::Sell));
        }

        let entry = ctx
            .entry_point()
            .ok_or(BacktestError::InconsistentState("long position without an entry point"))?;
        let highest = ctx
            .highest_close(entry.time, bar.time)
            .ok_or(BacktestError::InconsistentState("no bars between entry and current bar"))?;
        if highest.close - bar.close >= self.params.stop_profit {
            return Ok(self.flatten(ctx, DecisionReason::StopProfit, Side::Sell));
        }

        Ok(Decision::Hold)
    }

    fn short_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        // entry signal flipped long: abandon the short position
        if self.entry_decision(bar, ctx)?.is_buy() {
            return Ok(self.flatten(ctx, DecisionReason::StopLoss, Side::Buy));
        }

        let last_sell = ctx
            .last_transaction(Side::Sell)
            .ok_or(BacktestError::InconsistentState("short position without a recorded sell"))?;

        if last_sell.price - bar.close >= self.params.add_step && self.adds < self.params.max_adds {
            self.adds += 1;
            return Ok(Decision::sell(self.params.enter_volume, DecisionReason::Add));
        }

        if bar.close - last_sell.price >= self.params.stop_loss {
            return Ok(self.flatten(ctx, DecisionReason::StopLoss, Side::Buy));
        }

        let entry = ctx
            .entry_point()
            .ok_or(BacktestError::InconsistentState("short position without an entry point"))?;
        let lowest = ctx
            .lowest_close(entry.time, bar.time)
            .ok_or(BacktestError::InconsistentState("no bars between entry and current bar"))?;
        if bar.close - lowest.close >= self.params.stop_profit {
            return Ok(self.flatten(ctx, DecisionReason::StopProfit, Side::Buy));
        }

        Ok(Decision::Hold)
    }
}
