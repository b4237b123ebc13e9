//! Strategy dispatch
//!
//! The pluggable capability consumed by the engine: a preprocessing hook
//! plus one decision handler per derived position state (flat, long, short).
//! Concrete strategies implement these four; the engine owns the dispatch.

mod average;
mod ma_trend;

pub use average::{AverageParams, AverageStrategy};
pub use ma_trend::{MaTrendParams, MaTrendStrategy};

use crate::engine::{Decision, TradingContext};
use crate::error::BacktestError;
use crate::series::Candle;

/// Per-bar decision hooks a concrete strategy implements.
///
/// Handlers receive the context by shared reference and must not retain it
/// beyond the call; all mutation of run state stays with the engine.
pub trait Strategy {
    /// One-shot setup before the replay loop starts, e.g. precomputing
    /// resampled indicator series.
    fn init(&mut self, _ctx: &TradingContext) -> Result<(), BacktestError> {
        Ok(())
    }

    /// Update rolling indicators before any decision is made for `bar`.
    fn preprocess(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<(), BacktestError>;

    /// Decide from a flat book. May open long or short.
    fn entry_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError>;

    /// Decide while net long.
    fn long_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError>;

    /// Decide while net short.
    fn short_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn init(&mut self, ctx: &TradingContext) -> Result<(), BacktestError> {
        (**self).init(ctx)
    }

    fn preprocess(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<(), BacktestError> {
        (**self).preprocess(bar, ctx)
    }

    fn entry_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        (**self).entry_decision(bar, ctx)
    }

    fn long_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        (**self).long_position_decision(bar, ctx)
    }

    fn short_position_decision(&mut self, bar: &Candle, ctx: &TradingContext) -> Result<Decision, BacktestError> {
        (**self).short_position_decision(bar, ctx)
    }
}
