//! Run reporting
//!
//! Reshapes a finished run into chart-aligned arrays: one entry per bar for
//! price, cumulative held volume, and cumulative realized profit, so a
//! downstream renderer can plot them on a shared time axis.

use crate::engine::{BacktestReport, Settlement, Transaction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Chart-aligned view of a finished run.
#[derive(Debug, Serialize)]
pub struct ChartReport {
    /// Bar timestamps, formatted `MM-dd HH:mm`.
    pub times: Vec<String>,
    /// Close per bar.
    pub prices: Vec<Decimal>,
    /// Cumulative held volume per bar.
    pub held_volumes: Vec<Decimal>,
    /// Cumulative realized profit per bar.
    pub cumulative_profit: Vec<Decimal>,
    /// Total realized profit of the run.
    pub profit: Decimal,
    pub transactions: Vec<Transaction>,
    pub settlements: Vec<Settlement>,
}

impl ChartReport {
    pub fn from_run(report: &BacktestReport) -> Self {
        let by_time_tx: HashMap<DateTime<Utc>, &Transaction> =
            report.transactions.iter().map(|t| (t.time, t)).collect();
        let by_time_settlement: HashMap<DateTime<Utc>, &Settlement> =
            report.settlements.iter().map(|s| (s.time, s)).collect();

        let bars = report.data.series().points();
        let mut times = Vec::with_capacity(bars.len());
        let mut prices = Vec::with_capacity(bars.len());
        let mut held_volumes = Vec::with_capacity(bars.len());
        let mut cumulative_profit = Vec::with_capacity(bars.len());

        let mut held = Decimal::ZERO;
        let mut profit = Decimal::ZERO;
        for bar in bars {
            if let Some(transaction) = by_time_tx.get(&bar.time) {
                held += transaction.volume;
            }
            if let Some(settlement) = by_time_settlement.get(&bar.time) {
                profit += settlement.profit;
            }
            times.push(bar.time.format("%m-%d %H:%M").to_string());
            prices.push(bar.close);
            held_volumes.push(held);
            cumulative_profit.push(profit);
        }

        Self {
            times,
            prices,
            held_volumes,
            cumulative_profit,
            profit: report.profit,
            transactions: report.transactions.clone(),
            settlements: report.settlements.clone(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
