//! Position accounting
//!
//! Converts a decision volume into a funds/volume mutation on the trading
//! context, charging margin for exposure increases and releasing proceeds
//! for decreases, with a bounded tolerance for temporary overspend.

use super::context::TradingContext;
use super::types::PositionState;
use crate::series::Candle;
use rust_decimal::Decimal;

/// Outcome of applying one decision to the context.
///
/// Three-way so a silent rejection can never be mistaken for success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountingOutcome {
    /// New volume and surplus funds were committed.
    Accepted,
    /// Deficit exceeded the allowance; the bar is skipped without a
    /// transaction.
    RejectedSilently,
    /// Deficit exceeded the allowance and the run is configured to abort.
    RejectedFatal { deficit: Decimal, allowance: Decimal },
}

/// Apply a non-zero decision volume against the bar's close price.
pub(crate) fn apply_decision(ctx: &mut TradingContext, bar: &Candle, volume: Decimal) -> AccountingOutcome {
    let old_volume = ctx.held_volume();
    let new_volume = old_volume + volume;

    let (increase, decrease) = classify_transition(old_volume, new_volume);

    let fee_rate = ctx.params().fee.fee_rate();
    let margin = increase * bar.close * fee_rate;
    let proceeds = decrease * bar.close * fee_rate;
    let surplus = ctx.surplus_funds() - margin + proceeds;

    if surplus < Decimal::ZERO {
        let allowance = ctx.params().initial_funds * ctx.params().overspend_rate;
        let deficit = surplus.abs();
        if deficit > allowance {
            return if ctx.params().fail_on_overspend {
                AccountingOutcome::RejectedFatal { deficit, allowance }
            } else {
                AccountingOutcome::RejectedSilently
            };
        }
    }

    ctx.commit(new_volume, surplus);
    AccountingOutcome::Accepted
}

/// Split a volume transition into (exposure increase, exposure decrease).
///
/// Same-side transitions increase or decrease by the magnitude delta. A sign
/// change (including through zero, or from/to flat) closes the old exposure
/// entirely and opens the new one in the same step.
fn classify_transition(old_volume: Decimal, new_volume: Decimal) -> (Decimal, Decimal) {
    if PositionState::of(old_volume) == PositionState::of(new_volume) {
        let old_abs = old_volume.abs();
        let new_abs = new_volume.abs();
        if new_abs > old_abs {
            (new_abs - old_abs, Decimal::ZERO)
        } else {
            (Decimal::ZERO, old_abs - new_abs)
        }
    } else {
        (new_volume.abs(), old_volume.abs())
    }
}
