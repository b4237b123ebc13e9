//! Simulation engine
//!
//! Time-ordered replay of a candle series through a strategy: per-bar
//! decision dispatch, position/margin accounting, and end-of-run settlement.

mod accounting;
mod context;
mod settlement;
mod types;

pub use accounting::AccountingOutcome;
pub use context::TradingContext;
pub use types::{
    Decision, DecisionReason, FeeModel, FuturesFee, Parameters, PositionState, Settlement, Side,
    Transaction,
};

use crate::error::BacktestError;
use crate::series::{Candle, TimeSeries};
use crate::strategy::Strategy;
use rust_decimal::Decimal;

/// Everything a finished run produces, handed back for reporting.
#[derive(Debug)]
pub struct BacktestReport {
    /// Sum of settlement profits, rounded to 2 decimal places half-up.
    pub profit: Decimal,
    pub transactions: Vec<Transaction>,
    pub settlements: Vec<Settlement>,
    /// The original (unrestricted) input series.
    pub data: TimeSeries<Candle>,
}

/// One configured simulation run: a strategy plus run parameters.
pub struct Backtest<S: Strategy> {
    strategy: S,
    params: Parameters,
}

impl<S: Strategy> Backtest<S> {
    pub fn new(strategy: S, params: Parameters) -> Self {
        Self { strategy, params }
    }

    /// Replay `data` through the strategy and settle the resulting log.
    ///
    /// Bars are processed in strictly ascending time order, restricted to
    /// the parameters' `[start, end]` window. Any error aborts the run
    /// before settlement; no partial results are returned.
    pub fn run(mut self, data: TimeSeries<Candle>) -> Result<BacktestReport, BacktestError> {
        let (start, end) = (self.params.start, self.params.end);
        let mut ctx = TradingContext::new(data, self.params);

        self.strategy.init(&ctx)?;

        let bars = ctx.data().find(start, end).series().points().to_vec();
        tracing::debug!(bars = bars.len(), "starting replay");

        for bar in &bars {
            self.strategy.preprocess(bar, &ctx)?;

            let decision = match ctx.position_state() {
                PositionState::Flat => self.strategy.entry_decision(bar, &ctx)?,
                PositionState::Long => self.strategy.long_position_decision(bar, &ctx)?,
                PositionState::Short => self.strategy.short_position_decision(bar, &ctx)?,
            };

            let Decision::Trade { volume, reason } = decision else {
                continue;
            };
            if volume.is_zero() {
                continue;
            }

            match accounting::apply_decision(&mut ctx, bar, volume) {
                AccountingOutcome::Accepted => {}
                AccountingOutcome::RejectedSilently => {
                    tracing::debug!(time = %bar.time, %volume, "decision skipped: insufficient funds");
                    continue;
                }
                AccountingOutcome::RejectedFatal { deficit, allowance } => {
                    return Err(BacktestError::InsufficientFunds { deficit, allowance });
                }
            }

            if reason == DecisionReason::Entry {
                ctx.set_entry_point(bar.clone());
            }
            ctx.push_transaction(Transaction {
                volume,
                price: bar.close,
                time: bar.time,
                reason,
            });
        }

        let lever = ctx.params().fee.lever();
        let settlements = settlement::settle(ctx.transactions(), lever);
        let profit = settlement::total_profit(&settlements);

        let (data, transactions) = ctx.into_parts();
        tracing::info!(
            %profit,
            transactions = transactions.len(),
            settlements = settlements.len(),
            "replay finished"
        );

        Ok(BacktestReport { profit, transactions, settlements, data })
    }
}
