//! Parallel RTP estimation
//!
//! Spins are split into one partition per worker. Each worker owns its
//! entropy stream and plays its partition on a dedicated rayon pool; partial
//! results are reduced once, in partition order, after every worker joins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use reelsim_core::validate_bet;

use crate::config::SimulationConfig;
use crate::error::{SimResult, SimulationError};
use crate::model::SpinModel;
use crate::partition::plan;
use crate::report::{IncompleteResult, SimulationResult};
use crate::worker::{CancelToken, PartialResult, WorkerOutcome, WorkerSettings, run_partition};

/// Monte-Carlo RTP estimator over any [`SpinModel`]
pub struct Simulator<'m, M: SpinModel + ?Sized> {
    model: &'m M,
    config: SimulationConfig,
    cancel: CancelToken,
}

impl<'m, M: SpinModel + ?Sized> Simulator<'m, M> {
    pub fn new(model: &'m M, config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            model,
            config,
            cancel: CancelToken::new(),
        })
    }

    /// Share an external cancellation token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops a running estimate between spins
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Play `spins` spins at `bet` across the configured workers
    pub fn estimate_rtp(&self, spins: u64, bet: f64) -> SimResult<SimulationResult> {
        validate_bet(bet)?;
        if spins == 0 {
            return Err(SimulationError::InvalidInput(
                "spin count must be at least 1".into(),
            ));
        }

        let workers = self.config.workers;
        let partitions = plan(spins, workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("reelsim-worker-{i}"))
            .build()
            .map_err(|e| SimulationError::Pool(e.to_string()))?;

        let settings = WorkerSettings {
            bet,
            seed: self.config.seed,
            retain_payouts: self.config.retain_payouts,
            cancel: &self.cancel,
        };

        log::info!(
            "simulating {} spins at bet {} on {} workers ({:?})",
            spins,
            bet,
            workers,
            self.config.seed
        );
        let started = Instant::now();
        let finished = AtomicUsize::new(0);

        let outcomes: Vec<WorkerOutcome> = pool.install(|| {
            partitions
                .par_iter()
                .map(|partition| {
                    let outcome = run_partition(self.model, partition, &settings);
                    let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                    log::info!("partition {} done ({}/{})", partition.index, done, workers);
                    outcome
                })
                .collect()
        });

        let result = reduce(outcomes, spins, bet, workers, &self.config)?;
        log::info!(
            "RTP {:.6} over {} spins in {:.2?}",
            result.rtp(),
            result.spins,
            started.elapsed()
        );
        Ok(result)
    }
}

/// Merge partials into an incomplete result
fn absorb(into: &mut IncompleteResult, partial: PartialResult) {
    into.partitions.push(partial.partition);
    into.spins += partial.spins;
    into.total_payout.merge(partial.total_payout);
    into.winning_spins += partial.winning_spins;
    into.hits.merge(&partial.hits);
    into.payouts.extend(partial.payouts);
}

/// Single reduce pass in partition order.
///
/// A failure wins over a cancellation. A failed run keeps completed
/// partitions only; a cancelled run keeps every spin that finished.
fn reduce(
    outcomes: Vec<WorkerOutcome>,
    spins: u64,
    bet: f64,
    workers: usize,
    config: &SimulationConfig,
) -> SimResult<SimulationResult> {
    let mut completed = IncompleteResult {
        bet,
        ..IncompleteResult::default()
    };
    let failed = outcomes
        .iter()
        .any(|o| matches!(o, WorkerOutcome::Failed { .. }));
    let mut cancelled = false;
    let mut failure: Option<(usize, String)> = None;

    for outcome in outcomes {
        match outcome {
            WorkerOutcome::Completed(partial) => absorb(&mut completed, partial),
            WorkerOutcome::Cancelled(partial) => {
                cancelled = true;
                if !failed {
                    absorb(&mut completed, partial);
                }
            }
            WorkerOutcome::Failed { partial, reason } => {
                log::warn!("partition {} failed: {}", partial.partition, reason);
                if failure.is_none() {
                    failure = Some((partial.partition, reason));
                }
            }
        }
    }

    if let Some((partition, reason)) = failure {
        return Err(SimulationError::WorkerFailed {
            partition,
            reason,
            partial: Box::new(completed),
        });
    }
    if cancelled {
        log::warn!("simulation cancelled after {} of {} spins", completed.spins, spins);
        return Err(SimulationError::Cancelled {
            partial: Box::new(completed),
        });
    }

    Ok(SimulationResult {
        spins: completed.spins,
        bet,
        workers,
        seed: config.seed,
        total_payout: completed.total_payout,
        winning_spins: completed.winning_spins,
        hits: completed.hits,
        payouts: completed.payouts,
    })
}

/// Estimate RTP with default settings on `workers` threads
pub fn estimate_rtp<M: SpinModel + ?Sized>(
    model: &M,
    spins: u64,
    bet: f64,
    workers: usize,
) -> SimResult<SimulationResult> {
    Simulator::new(model, SimulationConfig::default().with_workers(workers))?.estimate_rtp(spins, bet)
}
