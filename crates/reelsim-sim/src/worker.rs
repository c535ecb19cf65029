//! Per-partition spin loop

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reelsim_core::{EntropyResult, EntropySource, SpinError, SpinResult, StreamKey};

use crate::config::SeedStrategy;
use crate::model::SpinModel;
use crate::partition::Partition;
use crate::tally::{HitTally, PayoutSum};

/// Shared cancellation flag, checked between spins
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Payouts reserved up front when the sequence is retained; the vector grows
/// past this as spins complete
pub const PAYOUT_RESERVE: u64 = 1 << 20;

/// What one worker produced
#[derive(Debug, Clone, Default)]
pub struct PartialResult {
    pub partition: usize,
    pub spins: u64,
    pub total_payout: PayoutSum,
    pub winning_spins: u64,
    pub hits: HitTally,
    pub payouts: Vec<f64>,
}

impl PartialResult {
    fn new(partition: &Partition, retain_payouts: bool) -> Self {
        Self {
            partition: partition.index,
            payouts: if retain_payouts {
                Vec::with_capacity(partition.spins.min(PAYOUT_RESERVE) as usize)
            } else {
                Vec::new()
            },
            ..Self::default()
        }
    }

    fn push(&mut self, payout: f64, bet: f64, retain: bool) {
        self.spins += 1;
        self.total_payout.record(payout, bet);
        if payout > 0.0 {
            self.winning_spins += 1;
        }
        if retain {
            self.payouts.push(payout);
        }
    }
}

/// How a partition ended
#[derive(Debug)]
pub enum WorkerOutcome {
    Completed(PartialResult),
    Cancelled(PartialResult),
    Failed { partial: PartialResult, reason: String },
}

/// Per-run settings every worker shares
#[derive(Debug, Clone, Copy)]
pub struct WorkerSettings<'a> {
    pub bet: f64,
    pub seed: SeedStrategy,
    pub retain_payouts: bool,
    pub cancel: &'a CancelToken,
}

/// Entropy for one partition.
///
/// Fixed seeding keys every spin by its global index, so the stream a spin
/// sees does not depend on which worker plays it.
enum Streams {
    Fixed { source: EntropySource, base_nonce: u64 },
    Owned(EntropySource),
}

impl Streams {
    fn open(seed: SeedStrategy) -> EntropyResult<Self> {
        match seed {
            SeedStrategy::Fixed(seed) => {
                let key = StreamKey::from_seed(seed);
                Ok(Streams::Fixed {
                    base_nonce: key.nonce,
                    source: EntropySource::new(key, 0),
                })
            }
            SeedStrategy::Independent => Ok(Streams::Owned(EntropySource::from_os()?)),
        }
    }

    fn for_spin(&mut self, spin: u64) -> &mut EntropySource {
        match self {
            Streams::Fixed { source, base_nonce } => {
                source.seek(base_nonce.wrapping_add(spin), 0);
                source
            }
            Streams::Owned(source) => source,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Play every spin of one partition. Panics inside the model are caught and
/// reported with the spins completed before them.
pub fn run_partition<M: SpinModel + ?Sized>(
    model: &M,
    partition: &Partition,
    settings: &WorkerSettings<'_>,
) -> WorkerOutcome {
    let mut partial = PartialResult::new(partition, settings.retain_payouts);

    let mut streams = match Streams::open(settings.seed) {
        Ok(streams) => streams,
        Err(e) => {
            return WorkerOutcome::Failed {
                partial,
                reason: e.to_string(),
            };
        }
    };

    let run = panic::catch_unwind(AssertUnwindSafe(|| -> SpinResult<bool> {
        for spin in partition.start..partition.end() {
            if settings.cancel.is_cancelled() {
                return Ok(false);
            }
            let source = streams.for_spin(spin);
            let payout = model.play(source, settings.bet, &mut partial.hits)?;
            if !(payout.is_finite() && payout >= 0.0) {
                return Err(SpinError::InvalidInput(format!(
                    "spin {spin} paid {payout}, payouts must be finite and non-negative"
                )));
            }
            partial.push(payout, settings.bet, settings.retain_payouts);
        }
        Ok(true)
    }));

    match run {
        Ok(Ok(true)) => {
            log::debug!(
                "partition {} finished {} spins",
                partition.index,
                partial.spins
            );
            WorkerOutcome::Completed(partial)
        }
        Ok(Ok(false)) => WorkerOutcome::Cancelled(partial),
        Ok(Err(e)) => {
            let reason = e.to_string();
            WorkerOutcome::Failed { partial, reason }
        }
        Err(payload) => WorkerOutcome::Failed {
            reason: format!("panic: {}", panic_message(payload.as_ref())),
            partial,
        },
    }
}
