//! Settlement walk
//!
//! Derives realized-profit events from a completed transaction log. Nothing
//! is computed incrementally during the replay; the walk runs once over the
//! final log.

use super::types::{Settlement, Transaction};
use rust_decimal::{Decimal, RoundingStrategy};

/// Walk the log in chronological order, emitting one settlement each time
/// the running volume returns exactly to zero.
///
/// The running notional sum over a closed round trip equals cost minus
/// proceeds, so profit is its negation, scaled by leverage.
pub(crate) fn settle(transactions: &[Transaction], lever: Decimal) -> Vec<Settlement> {
    let mut held_volume = Decimal::ZERO;
    let mut notional = Decimal::ZERO;
    let mut settlements = Vec::new();

    for transaction in transactions {
        held_volume += transaction.volume;
        notional += transaction.price * transaction.volume;
        if held_volume.is_zero() {
            settlements.push(Settlement { profit: -notional * lever, time: transaction.time });
            notional = Decimal::ZERO;
        }
    }

    settlements
}

/// Total realized profit, rounded to 2 decimal places half-up.
pub(crate) fn total_profit(settlements: &[Settlement]) -> Decimal {
    settlements
        .iter()
        .map(|s| s.profit)
        .sum::<Decimal>()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::DecisionReason;
    use crate::series::tests::ts;
    use rust_decimal_macros::dec;

    fn tx(volume: Decimal, price: Decimal, secs: i64) -> Transaction {
        Transaction { volume, price, time: ts(secs), reason: DecisionReason::Entry }
    }

    #[test]
    fn test_worked_example_from_partial_adds() {
        // buy 5 @ 100, buy 5 @ 102, sell 10 @ 105
        let log = vec![
            tx(dec!(5), dec!(100), 60),
            tx(dec!(5), dec!(102), 120),
            tx(dec!(-10), dec!(105), 180),
        ];
        let settlements = settle(&log, dec!(3));
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].time, ts(180));
        // (105*10 - 100*5 - 102*5) * 3 = 40 * 3
        assert_eq!(settlements[0].profit, dec!(120));
    }

    #[test]
    fn test_no_settlement_while_position_open() {
        let log = vec![tx(dec!(5), dec!(100), 60), tx(dec!(-2), dec!(104), 120)];
        assert!(settle(&log, dec!(1)).is_empty());
    }

    #[test]
    fn test_short_round_trip_profits_on_decline() {
        // sell 4 @ 100, buy 4 @ 90: profit = (100 - 90) * 4 = 40
        let log = vec![tx(dec!(-4), dec!(100), 60), tx(dec!(4), dec!(90), 120)];
        let settlements = settle(&log, dec!(1));
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].profit, dec!(40));
    }

    #[test]
    fn test_accumulators_reset_between_round_trips() {
        let log = vec![
            tx(dec!(2), dec!(100), 60),
            tx(dec!(-2), dec!(110), 120), // +20
            tx(dec!(-3), dec!(110), 180),
            tx(dec!(3), dec!(100), 240), // +30
        ];
        let settlements = settle(&log, dec!(1));
        assert_eq!(settlements.len(), 2);
        assert_eq!(settlements[0].profit, dec!(20));
        assert_eq!(settlements[0].time, ts(120));
        assert_eq!(settlements[1].profit, dec!(30));
        assert_eq!(settlements[1].time, ts(240));
    }

    #[test]
    fn test_zero_sum_property_over_whole_log() {
        // volume returns to zero twice; total profit must equal the negated
        // notional sum over the whole log, scaled by leverage
        let lever = dec!(7);
        let log = vec![
            tx(dec!(5), dec!(101.5), 60),
            tx(dec!(3), dec!(102.25), 120),
            tx(dec!(-8), dec!(103), 180),
            tx(dec!(-2), dec!(99), 240),
            tx(dec!(2), dec!(97.5), 300),
        ];
        let whole_log_notional: Decimal = log.iter().map(|t| t.price * t.volume).sum();
        let settlements = settle(&log, lever);
        let total: Decimal = settlements.iter().map(|s| s.profit).sum();
        assert_eq!(total, -whole_log_notional * lever);
    }

    #[test]
    fn test_total_profit_rounds_half_up() {
        let settlements = vec![
            Settlement { profit: dec!(10.005), time: ts(60) },
            Settlement { profit: dec!(0.01), time: ts(120) },
        ];
        assert_eq!(total_profit(&settlements), dec!(10.02));
    }

    #[test]
    fn test_empty_log_settles_to_nothing() {
        assert!(settle(&[], dec!(1)).is_empty());
        assert_eq!(total_profit(&[]), dec!(0));
    }
}
