//! Simulation error taxonomy
//!
//! Every variant is fatal to the run: a mid-replay invariant violation
//! invalidates all accounting that would follow it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum BacktestError {
    /// Series construction found two points with the same timestamp
    #[error("duplicate timestamp in series: {0}")]
    DuplicateTimestamp(DateTime<Utc>),
    /// A windowed lookup anchored on a timestamp the series does not contain
    #[error("anchor {0} not present in series")]
    AnchorNotFound(DateTime<Utc>),
    /// A backward window asked for more predecessors than exist
    #[error("window requested {requested} preceding points, only {available} available")]
    InsufficientLookback { requested: usize, available: usize },
    /// Resample target is finer than the source interval
    #[error("cannot resample a {source_secs}s series to a finer {target_secs}s interval")]
    IllegalResample { source_secs: i64, target_secs: i64 },
    /// Funds deficit exceeded the overspend allowance with the fail flag set
    #[error("surplus funds deficit {deficit} exceeds overspend allowance {allowance}")]
    InsufficientFunds { deficit: Decimal, allowance: Decimal },
    /// A decision handler found the transaction log missing a record it
    /// depends on (e.g. the opening trade of the current position)
    #[error("inconsistent state: {0}")]
    InconsistentState(&'static str),
}
