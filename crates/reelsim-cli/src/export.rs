//! Simulation report export (JSON and CSV)

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use reelsim_core::SymbolSet;
use reelsim_sim::{HistogramBucket, HitRow, RtpPoint, SimulationResult};

/// Serializable summary of one run
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub spins: u64,
    pub bet: f64,
    pub workers: usize,
    pub total_bet: f64,
    pub total_payout: f64,
    pub rtp: f64,
    pub theoretical_rtp: Option<f64>,
    pub hit_rate: f64,
    pub hits: Vec<HitRow>,
    pub running_rtp: Vec<RtpPoint>,
    pub payout_histogram: Vec<HistogramBucket>,
}

impl SimulationReport {
    pub fn new(
        result: &SimulationResult,
        symbols: &SymbolSet,
        theoretical_rtp: Option<f64>,
        points: usize,
        bins: usize,
    ) -> Self {
        Self {
            spins: result.spins,
            bet: result.bet,
            workers: result.workers,
            total_bet: result.total_bet(),
            total_payout: result.total_payout(),
            rtp: result.rtp(),
            theoretical_rtp,
            hit_rate: result.hit_rate(),
            hits: result.hits.rows(symbols),
            running_rtp: result.running_rtp_sampled(points),
            payout_histogram: result.payout_histogram(bins),
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Running RTP series as `spin,rtp` rows
    pub fn write_rtp_csv(&self, path: &Path) -> Result<()> {
        write_csv(path, &self.running_rtp)
    }

    /// Hit table as `label,count` rows
    pub fn write_hits_csv(&self, path: &Path) -> Result<()> {
        write_csv(path, &self.hits)
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
