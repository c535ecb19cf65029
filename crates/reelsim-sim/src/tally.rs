//! Hit counting and exact payout accumulation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reelsim_core::{SymbolSet, WinKey};

/// Fixed-point resolution of accumulated returns, per unit of stake
pub const MICROS_PER_STAKE: f64 = 1_000_000.0;

/// Sum of payouts measured in stakes (`payout / bet`), kept in integer
/// micro-stakes so partial sums merge to the same total in any grouping.
///
/// Paytable multipliers and bonus awards are bet multiples, so the recorded
/// value does not depend on the size of the bet. Multipliers finer than one
/// micro-stake are rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PayoutSum(u128);

impl PayoutSum {
    /// Add one payout won at `bet`. Payouts must be finite and non-negative,
    /// and `bet` positive.
    pub fn record(&mut self, payout: f64, bet: f64) {
        self.0 += (payout / bet * MICROS_PER_STAKE).round() as u128;
    }

    pub fn merge(&mut self, other: PayoutSum) {
        self.0 += other.0;
    }

    pub fn micros(&self) -> u128 {
        self.0
    }

    /// Total return in stakes
    pub fn stakes(&self) -> f64 {
        self.0 as f64 / MICROS_PER_STAKE
    }

    /// Total return in credits at `bet`
    pub fn credits(&self, bet: f64) -> f64 {
        self.stakes() * bet
    }
}

/// Hit counts per win key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitTally {
    counts: BTreeMap<WinKey, u64>,
}

/// One labelled row of a hit table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRow {
    pub label: String,
    pub count: u64,
}

impl HitTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: WinKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: &HitTally) {
        for (&key, &count) in &other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    pub fn get(&self, key: &WinKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WinKey, u64)> + '_ {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Labelled rows, most frequent first
    pub fn rows(&self, symbols: &SymbolSet) -> Vec<HitRow> {
        let mut rows: Vec<HitRow> = self
            .counts
            .iter()
            .map(|(key, &count)| HitRow {
                label: key.label(symbols),
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        rows
    }
}
