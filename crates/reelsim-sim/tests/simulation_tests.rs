// ============================================================================
// reelsim-sim integration tests
// Worker-count invariance, convergence, failure and cancellation reporting
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use approx::assert_abs_diff_eq;
use reelsim_core::{
    ComboPay, EntropySource, FlatConfig, FlatGame, PaylineConfig, PaylineGame, SpinError, SpinResult,
    StreamKey, SymbolSet, WeightedSymbol,
};
use reelsim_sim::{
    CancelToken, HitTally, SeedStrategy, SimulationConfig, SimulationError, Simulator, SpinModel,
    estimate_rtp,
};

// ============================================================================
// TEST MODELS
// ============================================================================

/// Three symbols, three-of-a-kind pays, RTP 0.465 with a small variance
fn low_variance_flat() -> FlatGame {
    let config = FlatConfig {
        symbols: vec![
            WeightedSymbol::new("X", 0.5),
            WeightedSymbol::new("Y", 0.3),
            WeightedSymbol::new("Z", 0.2),
        ],
        paytable: vec![
            ComboPay::triple("X", 2.0),
            ComboPay::triple("Y", 5.0),
            ComboPay::triple("Z", 10.0),
        ],
    };
    FlatGame::new(&config).unwrap()
}

/// Panics on one global spin index (only meaningful with a fixed seed)
struct PanicAt {
    inner: FlatGame,
    nonce: u64,
}

impl PanicAt {
    fn new(seed: u64, spin: u64) -> Self {
        Self {
            inner: FlatGame::classic(),
            nonce: StreamKey::from_seed(seed).nonce.wrapping_add(spin),
        }
    }
}

impl SpinModel for PanicAt {
    fn play(&self, source: &mut EntropySource, bet: f64, hits: &mut HitTally) -> SpinResult<f64> {
        if source.nonce() == self.nonce {
            panic!("reel jammed");
        }
        self.inner.play(source, bet, hits)
    }

    fn symbols(&self) -> &SymbolSet {
        self.inner.symbols()
    }
}

/// Returns an error on every spin
struct Broken(FlatGame);

impl SpinModel for Broken {
    fn play(&self, _source: &mut EntropySource, _bet: f64, _hits: &mut HitTally) -> SpinResult<f64> {
        Err(SpinError::InvalidInput("broken model".into()))
    }

    fn symbols(&self) -> &SymbolSet {
        self.0.symbols()
    }
}

/// Pays a negative amount on every spin
struct NegativePay(FlatGame);

impl SpinModel for NegativePay {
    fn play(&self, _source: &mut EntropySource, bet: f64, _hits: &mut HitTally) -> SpinResult<f64> {
        Ok(-bet)
    }

    fn symbols(&self) -> &SymbolSet {
        self.0.symbols()
    }
}

/// Cancels the run once it has played `limit` spins
struct CancelAfter {
    inner: FlatGame,
    played: AtomicU64,
    limit: u64,
    token: CancelToken,
}

impl SpinModel for CancelAfter {
    fn play(&self, source: &mut EntropySource, bet: f64, hits: &mut HitTally) -> SpinResult<f64> {
        if self.played.fetch_add(1, Ordering::SeqCst) + 1 == self.limit {
            self.token.cancel();
        }
        self.inner.play(source, bet, hits)
    }

    fn symbols(&self) -> &SymbolSet {
        self.inner.symbols()
    }
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn test_flat_totals_match_across_worker_counts() {
    let game = FlatGame::classic();
    let run = |workers| {
        Simulator::new(&game, SimulationConfig::seeded(42).with_workers(workers))
            .unwrap()
            .estimate_rtp(20_000, 1.0)
            .unwrap()
    };
    let one = run(1);
    let eight = run(8);

    assert_eq!(one.total_payout, eight.total_payout);
    assert_eq!(one.payouts, eight.payouts);
    assert_eq!(one.hits, eight.hits);
    assert_eq!(one.rtp(), eight.rtp());
    assert_eq!(eight.workers, 8);
}

#[test]
fn test_payline_totals_match_across_worker_counts() {
    let game = PaylineGame::new(&PaylineConfig::six_by_five()).unwrap();
    let a = Simulator::new(&game, SimulationConfig::seeded(7).with_workers(1))
        .unwrap()
        .estimate_rtp(3_000, 2.0)
        .unwrap();
    let b = Simulator::new(&game, SimulationConfig::seeded(7).with_workers(5))
        .unwrap()
        .estimate_rtp(3_000, 2.0)
        .unwrap();
    assert_eq!(a.total_payout, b.total_payout);
    assert_eq!(a.hits, b.hits);
}

#[test]
fn test_retain_flag_drops_sequence_not_totals() {
    let game = FlatGame::classic();
    let kept = Simulator::new(&game, SimulationConfig::seeded(3).with_workers(2))
        .unwrap()
        .estimate_rtp(5_000, 1.0)
        .unwrap();
    let dropped = Simulator::new(
        &game,
        SimulationConfig::seeded(3).with_workers(2).with_retain_payouts(false),
    )
    .unwrap()
    .estimate_rtp(5_000, 1.0)
    .unwrap();

    assert!(dropped.payouts.is_empty());
    assert!(dropped.running_rtp().is_empty());
    assert_eq!(kept.total_payout, dropped.total_payout);
    assert_abs_diff_eq!(*kept.running_rtp().last().unwrap(), kept.rtp(), epsilon = 1e-9);
}

#[test]
fn test_rtp_does_not_depend_on_bet_size() {
    let game = FlatGame::classic();
    let run = |bet| {
        Simulator::new(&game, SimulationConfig::seeded(42).with_workers(4))
            .unwrap()
            .estimate_rtp(200_000, bet)
            .unwrap()
    };
    let unit = run(1.0);
    let tiny = run(1e-7);

    assert_eq!(unit.total_payout, tiny.total_payout);
    assert_eq!(unit.rtp(), tiny.rtp());
    assert_eq!(unit.hits, tiny.hits);
    assert_abs_diff_eq!(*tiny.running_rtp().last().unwrap(), tiny.rtp(), epsilon = 1e-9);
    assert_abs_diff_eq!(tiny.total_payout(), unit.total_payout() * 1e-7, epsilon = 1e-9);
}

// ============================================================================
// CONVERGENCE
// ============================================================================

#[test]
fn test_rtp_converges_to_theory() {
    let game = low_variance_flat();
    let theory = game.theoretical_rtp();
    let result = Simulator::new(
        &game,
        SimulationConfig::seeded(2024).with_workers(8).with_retain_payouts(false),
    )
    .unwrap()
    .estimate_rtp(2_000_000, 1.0)
    .unwrap();
    assert_abs_diff_eq!(result.rtp(), theory, epsilon = 0.005);
}

#[test]
fn test_independent_streams_estimate() {
    let game = low_variance_flat();
    let result = estimate_rtp(&game, 200_000, 1.0, 4).unwrap();
    assert_eq!(result.spins, 200_000);
    assert_eq!(result.seed, SeedStrategy::Independent);
    assert_abs_diff_eq!(result.rtp(), 0.465, epsilon = 0.03);
}

// ============================================================================
// FAILURE AND CANCELLATION
// ============================================================================

#[test]
fn test_panicking_partition_is_reported() {
    let model = PanicAt::new(9, 60);
    let sim = Simulator::new(&model, SimulationConfig::seeded(9).with_workers(4)).unwrap();

    match sim.estimate_rtp(100, 1.0) {
        Err(SimulationError::WorkerFailed {
            partition,
            reason,
            partial,
        }) => {
            assert_eq!(partition, 2);
            assert!(reason.contains("reel jammed"));
            assert_eq!(partial.partitions, vec![0, 1, 3]);
            assert_eq!(partial.spins, 75);
        }
        other => panic!("expected a worker failure, got {other:?}"),
    }
}

#[test]
fn test_model_error_is_reported() {
    let model = Broken(FlatGame::classic());
    let err = estimate_rtp(&model, 10, 1.0, 2).unwrap_err();
    assert!(matches!(err, SimulationError::WorkerFailed { .. }));
    assert_eq!(err.partial().map(|p| p.spins), Some(0));
}

#[test]
fn test_negative_payout_fails_partition() {
    let model = NegativePay(FlatGame::classic());
    match estimate_rtp(&model, 10, 1.0, 1) {
        Err(SimulationError::WorkerFailed { reason, partial, .. }) => {
            assert!(reason.contains("non-negative"));
            assert_eq!(partial.spins, 0);
        }
        other => panic!("expected a worker failure, got {other:?}"),
    }
}

#[test]
fn test_cancellation_keeps_completed_spins() {
    let token = CancelToken::new();
    let model = CancelAfter {
        inner: FlatGame::classic(),
        played: AtomicU64::new(0),
        limit: 10,
        token: token.clone(),
    };
    let sim = Simulator::new(&model, SimulationConfig::seeded(1).with_workers(1))
        .unwrap()
        .with_cancel_token(token);

    match sim.estimate_rtp(1_000, 1.0) {
        Err(SimulationError::Cancelled { partial }) => {
            assert_eq!(partial.spins, 10);
            assert_eq!(partial.payouts.len(), 10);
            assert_eq!(partial.total_bet(), 10.0);
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
}
