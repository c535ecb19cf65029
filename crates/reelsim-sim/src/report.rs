//! Simulation results

use serde::{Deserialize, Serialize};

use crate::config::SeedStrategy;
use crate::tally::{HitTally, PayoutSum};

/// One bucket of a payout histogram, `[lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// A point of the running RTP series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RtpPoint {
    /// Spins played so far (1-based)
    pub spin: u64,
    pub rtp: f64,
}

/// Running RTP over a payout sequence: after spin `k`, the cumulative payout
/// divided by `k * bet`
pub fn running_rtp(payouts: &[f64], bet: f64) -> Vec<f64> {
    let mut cumulative = 0.0;
    payouts
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            cumulative += p;
            cumulative / ((i + 1) as f64 * bet)
        })
        .collect()
}

/// Equal-width histogram over `[0, max]`. Zero payouts fall in the first
/// bucket; the maximum lands in the last.
pub fn payout_histogram(payouts: &[f64], buckets: usize) -> Vec<HistogramBucket> {
    if payouts.is_empty() || buckets == 0 {
        return Vec::new();
    }
    let max = payouts.iter().copied().fold(0.0_f64, f64::max);
    let width = if max > 0.0 { max / buckets as f64 } else { 1.0 };
    let mut counts = vec![0u64; buckets];
    for &p in payouts {
        let slot = ((p / width) as usize).min(buckets - 1);
        counts[slot] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBucket {
            lower: i as f64 * width,
            upper: (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Completed simulation
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub spins: u64,
    pub bet: f64,
    pub workers: usize,
    pub seed: SeedStrategy,
    pub total_payout: PayoutSum,
    pub winning_spins: u64,
    pub hits: HitTally,
    /// Per-spin payouts, partition by partition; empty when not retained
    pub payouts: Vec<f64>,
}

impl SimulationResult {
    pub fn total_bet(&self) -> f64 {
        self.spins as f64 * self.bet
    }

    pub fn total_payout(&self) -> f64 {
        self.total_payout.credits(self.bet)
    }

    /// Return to player: total payout over total stake
    pub fn rtp(&self) -> f64 {
        self.total_payout.stakes() / self.spins as f64
    }

    /// Share of spins that paid anything
    pub fn hit_rate(&self) -> f64 {
        self.winning_spins as f64 / self.spins as f64
    }

    pub fn running_rtp(&self) -> Vec<f64> {
        running_rtp(&self.payouts, self.bet)
    }

    /// Running RTP reduced to about `points` evenly spaced samples, always
    /// ending on the last spin
    pub fn running_rtp_sampled(&self, points: usize) -> Vec<RtpPoint> {
        let series = self.running_rtp();
        if series.is_empty() || points == 0 {
            return Vec::new();
        }
        let step = series.len().div_ceil(points).max(1);
        let mut sampled: Vec<RtpPoint> = series
            .iter()
            .enumerate()
            .skip(step - 1)
            .step_by(step)
            .map(|(i, &rtp)| RtpPoint {
                spin: i as u64 + 1,
                rtp,
            })
            .collect();
        if sampled.last().map(|p| p.spin) != Some(series.len() as u64) {
            sampled.push(RtpPoint {
                spin: series.len() as u64,
                rtp: series[series.len() - 1],
            });
        }
        sampled
    }

    pub fn payout_histogram(&self, buckets: usize) -> Vec<HistogramBucket> {
        payout_histogram(&self.payouts, buckets)
    }
}

/// Work finished before a run failed or was cancelled. Carries no RTP: the
/// spins it covers are not the spins that were requested.
#[derive(Debug, Clone, Default)]
pub struct IncompleteResult {
    /// Partitions whose spins are included
    pub partitions: Vec<usize>,
    pub spins: u64,
    pub bet: f64,
    pub total_payout: PayoutSum,
    pub winning_spins: u64,
    pub hits: HitTally,
    pub payouts: Vec<f64>,
}

impl IncompleteResult {
    pub fn total_bet(&self) -> f64 {
        self.spins as f64 * self.bet
    }

    pub fn total_payout(&self) -> f64 {
        self.total_payout.credits(self.bet)
    }
}
