// ============================================================================
// reelsim-core integration tests
// Entropy determinism, sampling, and both evaluation modes end to end
// ============================================================================

use approx::assert_abs_diff_eq;
use reelsim_core::{
    ComboPay, EntropySource, FixedBonus, FlatConfig, FlatGame, GameConfig, Grid, PaylineConfig,
    PaylineGame, PaylineSpin, Session, SpinError, SpinOutcome, StreamKey, SymbolId, WeightedSampler,
    WeightedSymbol, score_flat, score_line,
};

// ============================================================================
// TEST UTILITIES
// ============================================================================

/// Three-symbol flat game with a low-variance paytable (RTP 0.465)
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

/// 6×5 grid with `top` on row 0 and non-matching filler elsewhere
fn six_by_five_grid(game: &PaylineGame, top: [&str; 6]) -> Grid {
    let regular = ["A", "K", "Q", "J", "10", "9"];
    let id = |n: &str| game.symbols().id_of(n).unwrap();
    let columns: Vec<Vec<SymbolId>> = (0..6)
        .map(|reel| {
            (0..5)
                .map(|row| {
                    if row == 0 {
                        id(top[reel])
                    } else {
                        id(regular[(row + reel) % 6])
                    }
                })
                .collect()
        })
        .collect();
    Grid::from_columns(&columns).unwrap()
}

// ============================================================================
// ENTROPY
// ============================================================================

#[test]
fn test_same_key_nonce_counter_same_stream() {
    let key = StreamKey::from_seed(0xC0FFEE);
    let mut a = EntropySource::new(key, 10);
    let mut b = EntropySource::new(key, 10);
    assert_eq!(a.generate(300).unwrap(), b.generate(300).unwrap());
    assert_eq!(a.counter(), b.counter());
}

#[test]
fn test_same_seed_same_spins() {
    let game = FlatGame::classic();
    let mut a = EntropySource::from_seed(99);
    let mut b = EntropySource::from_seed(99);
    for _ in 0..1000 {
        assert_eq!(game.spin(&mut a, 1.0).unwrap(), game.spin(&mut b, 1.0).unwrap());
    }
}

#[test]
fn test_sampler_frequencies_follow_weights() {
    let sampler = WeightedSampler::new(&[5.0, 3.0, 2.0]).unwrap();
    let mut source = EntropySource::from_seed(2024);
    let mut words = vec![0u32; 100_000];
    source.fill_u32(&mut words).unwrap();

    let mut counts = [0usize; 3];
    for id in sampler.sample_batch(&words) {
        counts[id.index()] += 1;
    }
    for (count, expected) in counts.iter().zip([0.5, 0.3, 0.2]) {
        assert_abs_diff_eq!(*count as f64 / words.len() as f64, expected, epsilon = 0.01);
    }
}

// ============================================================================
// FLAT MODE
// ============================================================================

#[test]
fn test_classic_every_combination() {
    let game = FlatGame::classic();
    let symbols = game.symbols();
    let bet = 3.0;
    let mut paying = 0;
    for a in symbols.ids() {
        for b in symbols.ids() {
            for c in symbols.ids() {
                let payout = score_flat(&[a, b, c], game.paytable(), bet);
                if a == b && b == c {
                    paying += 1;
                    assert!(payout > 0.0, "{} should pay", symbols.name(a));
                } else {
                    assert_eq!(payout, 0.0);
                }
            }
        }
    }
    assert_eq!(paying, 7);
}

#[test]
fn test_flat_monte_carlo_matches_theory() {
    let game = low_variance_flat();
    assert_abs_diff_eq!(game.theoretical_rtp(), 0.465, epsilon = 1e-12);

    let spins = 200_000;
    let mut source = EntropySource::from_seed(7);
    let total: f64 = (0..spins)
        .map(|_| game.spin(&mut source, 1.0).unwrap().payout)
        .sum();
    assert_abs_diff_eq!(total / spins as f64, 0.465, epsilon = 0.02);
}

#[test]
fn test_flat_game_from_yaml() {
    let yaml = "
flat:
  symbols:
    - { name: Bar, weight: 1.0 }
    - { name: Seven, weight: 1.0 }
  paytable:
    - { combination: [Seven, Seven, Seven], multiplier: 100.0 }
    - { combination: [Bar, Seven, Bar], multiplier: 4.0 }
";
    let config = GameConfig::from_yaml_str(yaml).unwrap();
    let game = FlatGame::new(&config.flat).unwrap();
    // 100 / 8 + 4 / 8
    assert_abs_diff_eq!(game.theoretical_rtp(), 13.0, epsilon = 1e-12);
}

// ============================================================================
// PAYLINE MODE
// ============================================================================

#[test]
fn test_wild_line_on_full_grid() {
    let game = PaylineGame::new(&PaylineConfig::six_by_five()).unwrap();
    let grid = six_by_five_grid(&game, ["W", "A", "A", "A", "W", "A"]);
    let eval = game.evaluator().evaluate(&grid);

    assert_eq!(eval.line_wins.len(), 1);
    let win = &eval.line_wins[0];
    assert_eq!(win.line_index, 0);
    assert_eq!(game.symbols().name(win.symbol), "A");
    assert_eq!(win.wilds, 2);
    assert_eq!(eval.line_total, 20.0);
}

#[test]
fn test_bonus_symbol_breaks_line() {
    let game = PaylineGame::new(&PaylineConfig::six_by_five()).unwrap();
    let grid = six_by_five_grid(&game, ["A", "A", "B", "A", "A", "A"]);
    let eval = game.evaluator().evaluate(&grid);
    assert!(eval.line_wins.is_empty());
    assert_eq!(eval.bonus_count, 1);

    let line: Vec<SymbolId> = grid.cells().iter().step_by(5).copied().collect();
    assert_eq!(
        score_line(&line, game.evaluator().paytable(), game.evaluator().wild()),
        None
    );
}

#[test]
fn test_three_bonus_symbols_trigger_feature() {
    let config = PaylineConfig::six_by_five();
    let game = PaylineGame::with_bonus(&config, Box::new(FixedBonus::new(300.0).unwrap())).unwrap();
    let grid = six_by_five_grid(&game, ["B", "K", "B", "Q", "B", "J"]);
    let spin = game.settle(grid, &mut EntropySource::from_seed(1), 2.0).unwrap();
    assert_eq!(spin.outcome, SpinOutcome::Bonus { award: 600.0 });
}

#[test]
fn test_random_bonus_awards_in_range() {
    let game = PaylineGame::new(&PaylineConfig::six_by_five()).unwrap();
    let mut source = EntropySource::from_seed(11);
    for _ in 0..50 {
        let grid = six_by_five_grid(&game, ["B", "B", "B", "A", "K", "Q"]);
        let spin = game.settle(grid, &mut source, 1.0).unwrap();
        let award = spin.payout();
        assert!((100.0..=500.0).contains(&award));
    }
}

#[test]
fn test_stored_spin_round_trips_with_its_grid() {
    let game = PaylineGame::new(&PaylineConfig::six_by_five()).unwrap();
    let spin = game.spin(&mut EntropySource::from_seed(21), 1.0).unwrap();
    let json = serde_json::to_string(&spin).unwrap();
    let restored: PaylineSpin = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, spin);
    assert_eq!(game.evaluator().evaluate(&restored.grid), spin.evaluation);
}

#[test]
fn test_misshapen_grid_is_rejected_on_load() {
    let err = serde_json::from_str::<Grid>(r#"{"reels":6,"rows":5,"cells":[0,1]}"#).unwrap_err();
    assert!(err.to_string().contains("2 cells for a 6x5 grid"));
}

// ============================================================================
// SESSION
// ============================================================================

#[test]
fn test_session_plays_until_broke() {
    let game = PaylineGame::new(&PaylineConfig::six_by_five()).unwrap();
    let mut source = EntropySource::from_seed(5);
    let mut session = Session::new(3.0).unwrap();

    let mut played = 0;
    loop {
        match session.play_lines(&game, &mut source, 1.0) {
            Ok((next, _)) => {
                session = next;
                played += 1;
                if played > 10_000 {
                    break;
                }
            }
            Err(SpinError::InsufficientBalance { balance, bet }) => {
                assert!(balance < bet);
                break;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert!(played >= 3);
}
