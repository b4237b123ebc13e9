//! Engine value types
//!
//! Immutable records describing an intent (Decision), an executed fill
//! (Transaction), and a realized-profit event (Settlement), plus the fee
//! model seam and run parameters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a strategy wants to trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    Entry,
    Add,
    StopProfit,
    StopLoss,
}

/// A strategy's intent for one bar.
///
/// Positive volume buys, negative sells. A zero-volume trade and `Hold` are
/// both no-ops; the engine records neither as a transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Trade { volume: Decimal, reason: DecisionReason },
    Hold,
}

impl Decision {
    pub fn buy(volume: Decimal, reason: DecisionReason) -> Self {
        Decision::Trade { volume: volume.abs(), reason }
    }

    pub fn sell(volume: Decimal, reason: DecisionReason) -> Self {
        Decision::Trade { volume: -volume.abs(), reason }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Decision::Trade { volume, .. } if volume > &Decimal::ZERO)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Decision::Trade { volume, .. } if volume < &Decimal::ZERO)
    }
}

/// Side of an executed fill, derived from the sign of its volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

/// An executed fill: signed volume at the bar's close price.
///
/// Append-only once logged; never mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub volume: Decimal,
    pub price: Decimal,
    pub time: DateTime<Utc>,
    pub reason: DecisionReason,
}

impl Transaction {
    pub fn side(&self) -> Option<Side> {
        if self.volume > Decimal::ZERO {
            Some(Side::Buy)
        } else if self.volume < Decimal::ZERO {
            Some(Side::Sell)
        } else {
            None
        }
    }
}

/// A realized profit/loss event, emitted when held volume returns to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub profit: Decimal,
    pub time: DateTime<Utc>,
}

/// Position state derived from the sign of held volume.
///
/// Recomputed each step, never stored, so it cannot drift out of sync with
/// the volume itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

impl PositionState {
    pub fn of(held_volume: Decimal) -> Self {
        if held_volume.is_zero() {
            PositionState::Flat
        } else if held_volume > Decimal::ZERO {
            PositionState::Long
        } else {
            PositionState::Short
        }
    }
}

/// Margin and leverage model for one instrument.
pub trait FeeModel: Send + Sync {
    /// Margin charged (or released) per unit of notional, i.e. per
    /// `volume * price`.
    fn fee_rate(&self) -> Decimal;

    /// Multiplier applied to realized notional P&L.
    fn lever(&self) -> Decimal;
}

/// Futures contract fee model: a contract multiplier and a deposit
/// percentage. Margin rate is their product; leverage is the multiplier.
#[derive(Debug, Clone)]
pub struct FuturesFee {
    multiplier: Decimal,
    deposit_pct: Decimal,
}

impl FuturesFee {
    pub fn new(multiplier: Decimal, deposit_pct: Decimal) -> Self {
        Self { multiplier, deposit_pct }
    }
}

impl FeeModel for FuturesFee {
    fn fee_rate(&self) -> Decimal {
        self.multiplier * self.deposit_pct
    }

    fn lever(&self) -> Decimal {
        self.multiplier
    }
}

/// Immutable run-scoped backtest parameters.
pub struct Parameters {
    pub initial_funds: Decimal,
    pub fee: Box<dyn FeeModel>,
    /// Fraction of initial funds by which surplus may go temporarily
    /// negative before a decision is rejected.
    pub overspend_rate: Decimal,
    /// When true, a rejected decision aborts the run instead of silently
    /// skipping the bar.
    pub fail_on_overspend: bool,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decision_buy_normalizes_sign() {
        let decision = Decision::buy(dec!(-5), DecisionReason::Entry);
        assert!(decision.is_buy());
        assert!(matches!(decision, Decision::Trade { volume, .. } if volume == dec!(5)));
    }

    #[test]
    fn test_decision_sell_normalizes_sign() {
        let decision = Decision::sell(dec!(5), DecisionReason::StopLoss);
        assert!(decision.is_sell());
        assert!(matches!(decision, Decision::Trade { volume, .. } if volume == dec!(-5)));
    }

    #[test]
    fn test_hold_is_neither_buy_nor_sell() {
        assert!(!Decision::Hold.is_buy());
        assert!(!Decision::Hold.is_sell());
    }

    #[test]
    fn test_transaction_side() {
        let time = Utc.timestamp_opt(60, 0).unwrap();
        let buy = Transaction { volume: dec!(5), price: dec!(100), time, reason: DecisionReason::Entry };
        let sell = Transaction { volume: dec!(-5), price: dec!(100), time, reason: DecisionReason::StopLoss };
        assert_eq!(buy.side(), Some(Side::Buy));
        assert_eq!(sell.side(), Some(Side::Sell));
    }

    #[test]
    fn test_position_state_from_volume_sign() {
        assert_eq!(PositionState::of(dec!(0)), PositionState::Flat);
        assert_eq!(PositionState::of(dec!(0.5)), PositionState::Long);
        assert_eq!(PositionState::of(dec!(-3)), PositionState::Short);
    }

    #[test]
    fn test_futures_fee_rates() {
        let fee = FuturesFee::new(dec!(10000), dec!(0.02));
        assert_eq!(fee.fee_rate(), dec!(200.00));
        assert_eq!(fee.lever(), dec!(10000));
    }
}
