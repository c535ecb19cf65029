//! Simulation Benchmarks
//!
//! Spin throughput for both game modes, single spins and full parallel runs.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use reelsim_core::{EntropySource, FlatGame, PaylineConfig, PaylineGame, WeightedSampler};
use reelsim_sim::{SimulationConfig, Simulator};

const RUN_SPINS: u64 = 100_000;

/// Benchmark raw sampling from keystream words
fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let sampler = WeightedSampler::new(&[0.3, 0.25, 0.16, 0.13, 0.1, 0.035, 0.025]).unwrap();

    for &n in &[3usize, 30, 300] {
        group.throughput(Throughput::Elements(n as u64));
        let mut source = EntropySource::from_seed(1);
        let mut words = vec![0u32; n];
        group.bench_with_input(BenchmarkId::new("fill_and_sample", n), &n, |b, _| {
            b.iter(|| {
                source.fill_u32(&mut words).unwrap();
                black_box(sampler.sample_batch(&words))
            })
        });
    }

    group.finish();
}

/// Benchmark one spin per mode
fn bench_single_spin(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_spin");
    let flat = FlatGame::classic();
    let lines = PaylineGame::new(&PaylineConfig::six_by_five()).unwrap();

    let mut source = EntropySource::from_seed(2);
    group.bench_function("flat", |b| b.iter(|| black_box(flat.spin(&mut source, 1.0).unwrap())));

    let mut source = EntropySource::from_seed(3);
    group.bench_function("payline_6x5", |b| {
        b.iter(|| black_box(lines.spin(&mut source, 1.0).unwrap()))
    });

    group.finish();
}

/// Benchmark a full run across worker counts
fn bench_estimate_rtp(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_rtp");
    group.sample_size(10);
    group.throughput(Throughput::Elements(RUN_SPINS));
    let game = FlatGame::classic();

    for &workers in &[1usize, 2, 4, 8] {
        let config = SimulationConfig::seeded(42)
            .with_workers(workers)
            .with_retain_payouts(false);
        let sim = Simulator::new(&game, config).unwrap();
        group.bench_with_input(BenchmarkId::new("flat", workers), &workers, |b, _| {
            b.iter(|| black_box(sim.estimate_rtp(RUN_SPINS, 1.0).unwrap().rtp()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_single_spin, bench_estimate_rtp);
criterion_main!(benches);
