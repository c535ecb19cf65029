//! Simulation run configuration

use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError};

/// How worker entropy streams are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedStrategy {
    /// Every worker draws its own key and nonce from the OS
    Independent,
    /// One key derived from the seed; spin `i` runs on nonce `base + i` from
    /// block 0, so results do not depend on the worker count
    Fixed(u64),
}

impl Default for SeedStrategy {
    fn default() -> Self {
        SeedStrategy::Independent
    }
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_retain_payouts() -> bool {
    true
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Worker threads, one partition each
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub seed: SeedStrategy,
    /// Keep the per-spin payout sequence (needed for running RTP)
    #[serde(default = "default_retain_payouts")]
    pub retain_payouts: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            seed: SeedStrategy::Independent,
            retain_payouts: true,
        }
    }
}

impl SimulationConfig {
    /// Reproducible run on a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::default().with_seed(SeedStrategy::Fixed(seed))
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: SeedStrategy) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_retain_payouts(mut self, retain: bool) -> Self {
        self.retain_payouts = retain;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.workers == 0 {
            return Err(SimulationError::InvalidInput(
                "worker count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
