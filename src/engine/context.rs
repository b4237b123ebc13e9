//! Run-scoped simulation state

use super::types::{Parameters, PositionState, Side, Transaction};
use crate::series::{Candle, TimeSeries};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Mutable state of one simulation run.
///
/// Owned and mutated exclusively by the replay loop; decision handlers see
/// it by shared reference and must not retain references beyond the call.
pub struct TradingContext {
    data: TimeSeries<Candle>,
    params: Parameters,
    surplus_funds: Decimal,
    held_volume: Decimal,
    transactions: Vec<Transaction>,
    entry_point: Option<Candle>,
}

impl TradingContext {
    pub(crate) fn new(data: TimeSeries<Candle>, params: Parameters) -> Self {
        let surplus_funds = params.initial_funds;
        Self {
            data,
            params,
            surplus_funds,
            held_volume: Decimal::ZERO,
            transactions: Vec::new(),
            entry_point: None,
        }
    }

    /// The full original series, not restricted to the run window, so
    /// indicators can look back before the backtest start.
    pub fn data(&self) -> &TimeSeries<Candle> {
        &self.data
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn surplus_funds(&self) -> Decimal {
        self.surplus_funds
    }

    /// Signed held volume: positive long, negative short, zero flat.
    pub fn held_volume(&self) -> Decimal {
        self.held_volume
    }

    pub fn position_state(&self) -> PositionState {
        PositionState::of(self.held_volume)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The bar that opened the current position. `None` while flat.
    pub fn entry_point(&self) -> Option<&Candle> {
        self.entry_point.as_ref()
    }

    /// Most recent transaction on the given side.
    pub fn last_transaction(&self, side: Side) -> Option<&Transaction> {
        self.transactions.iter().rev().find(|t| t.side() == Some(side))
    }

    /// Highest close in the inclusive time range of the original series.
    pub fn highest_close(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Candle> {
        self.data.series().highest(Some(start), Some(end))
    }

    /// Lowest close in the inclusive time range of the original series.
    pub fn lowest_close(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Candle> {
        self.data.series().lowest(Some(start), Some(end))
    }

    /// Commit an accepted decision's accounting result.
    pub(crate) fn commit(&mut self, held_volume: Decimal, surplus_funds: Decimal) {
        self.held_volume = held_volume;
        self.surplus_funds = surplus_funds;
        if self.held_volume.is_zero() {
            self.entry_point = None;
        }
    }

    pub(crate) fn push_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub(crate) fn set_entry_point(&mut self, candle: Candle) {
        self.entry_point = Some(candle);
    }

    pub(crate) fn into_parts(self) -> (TimeSeries<Candle>, Vec<Transaction>) {
        (self.data, self.transactions)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::types::{DecisionReason, FuturesFee};
    use crate::series::tests::{flat_candle, ts};
    use crate::series::{Series, TimeInterval};
    use rust_decimal_macros::dec;

    pub(crate) fn test_params() -> Parameters {
        Parameters {
            initial_funds: dec!(1000),
            fee: Box::new(FuturesFee::new(dec!(1), dec!(0.1))),
            overspend_rate: dec!(0),
            fail_on_overspend: false,
            start: None,
            end: None,
        }
    }

    fn test_context() -> TradingContext {
        let candles = (1..=5).map(|i| flat_candle(dec!(100) + rust_decimal::Decimal::from(i), i * 60)).collect();
        let data = TimeSeries::new(Series::new(candles).unwrap(), TimeInterval::minutes(1));
        TradingContext::new(data, test_params())
    }

    #[test]
    fn test_new_context_starts_flat_with_initial_funds() {
        let ctx = test_context();
        assert_eq!(ctx.surplus_funds(), dec!(1000));
        assert_eq!(ctx.held_volume(), dec!(0));
        assert_eq!(ctx.position_state(), PositionState::Flat);
        assert!(ctx.transactions().is_empty());
        assert!(ctx.entry_point().is_none());
    }

    #[test]
    fn test_last_transaction_by_side() {
        let mut ctx = test_context();
        ctx.push_transaction(Transaction { volume: dec!(5), price: dec!(101), time: ts(60), reason: DecisionReason::Entry });
        ctx.push_transaction(Transaction { volume: dec!(-2), price: dec!(102), time: ts(120), reason: DecisionReason::StopLoss });
        ctx.push_transaction(Transaction { volume: dec!(3), price: dec!(103), time: ts(180), reason: DecisionReason::Add });

        assert_eq!(ctx.last_transaction(Side::Buy).unwrap().price, dec!(103));
        assert_eq!(ctx.last_transaction(Side::Sell).unwrap().price, dec!(102));
    }

    #[test]
    fn test_commit_clears_entry_point_when_flat_again() {
        let mut ctx = test_context();
        ctx.set_entry_point(flat_candle(dec!(101), 60));
        ctx.commit(dec!(5), dec!(900));
        assert!(ctx.entry_point().is_some());

        ctx.commit(dec!(0), dec!(1000));
        assert!(ctx.entry_point().is_none());
    }

    #[test]
    fn test_extremum_helpers_use_close() {
        let ctx = test_context();
        assert_eq!(ctx.highest_close(ts(60), ts(300)).unwrap().close, dec!(105));
        assert_eq!(ctx.lowest_close(ts(120), ts(240)).unwrap().close, dec!(102));
    }
}
