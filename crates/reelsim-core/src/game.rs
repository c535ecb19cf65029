//! Playable games built from configuration
//!
//! Both games are immutable once built and hold no entropy. Every spin takes
//! the caller's [`EntropySource`], so one game can be shared by many workers
//! that each own their stream.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::bonus::{BonusResolver, RangeBonus};
use crate::config::{FlatConfig, PaylineConfig};
use crate::entropy::EntropySource;
use crate::error::{ConfigResult, SpinResult, validate_bet};
use crate::evaluate::{LineEvaluation, PaylineEvaluator, WinKey, score_flat};
use crate::grid::{Grid, spin_grid};
use crate::payline::{Payline, default_paylines, validate_paylines};
use crate::paytable::{Combination, ComboPaytable, FLAT_REELS, LinePaytable};
use crate::sampler::WeightedSampler;
use crate::symbols::{SymbolDef, SymbolId, SymbolRole, SymbolSet};

// ═══════════════════════════════════════════════════════════════════════════
// FLAT MODE
// ═══════════════════════════════════════════════════════════════════════════

/// One flat-mode spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatSpin {
    /// Symbols left to right
    pub symbols: Combination,
    /// Credits won (`multiplier * bet`)
    pub payout: f64,
}

impl FlatSpin {
    /// Hit key, for winning combinations only
    pub fn win_key(&self) -> Option<WinKey> {
        (self.payout > 0.0).then_some(WinKey::Combination(self.symbols))
    }
}

/// Three reels, one row, exact-combination paytable
#[derive(Debug, Clone)]
pub struct FlatGame {
    symbols: SymbolSet,
    sampler: WeightedSampler,
    paytable: ComboPaytable,
}

impl FlatGame {
    pub fn new(config: &FlatConfig) -> ConfigResult<Self> {
        let symbols = SymbolSet::from_names(
            &config.symbols.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        )?;
        let weights: Vec<f64> = config.symbols.iter().map(|s| s.weight).collect();
        let sampler = WeightedSampler::for_symbols(symbols.len(), &weights)?;
        let paytable = ComboPaytable::build(&symbols, &config.paytable)?;

        log::debug!(
            "flat game: {} symbols, {} paying combinations",
            symbols.len(),
            paytable.len()
        );

        Ok(Self {
            symbols,
            sampler,
            paytable,
        })
    }

    /// The classic fruit machine preset
    pub fn classic() -> Self {
        // The preset is a compile-time constant and always valid.
        match Self::new(&FlatConfig::classic()) {
            Ok(game) => game,
            Err(e) => unreachable!("classic preset rejected: {e}"),
        }
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn sampler(&self) -> &WeightedSampler {
        &self.sampler
    }

    pub fn paytable(&self) -> &ComboPaytable {
        &self.paytable
    }

    /// Play one spin. The bet is validated before any entropy is drawn.
    pub fn spin(&self, source: &mut EntropySource, bet: f64) -> SpinResult<FlatSpin> {
        validate_bet(bet)?;
        let mut words = [0u32; FLAT_REELS];
        source.fill_u32(&mut words)?;
        let symbols = words.map(|w| self.sampler.sample_word(w));
        Ok(FlatSpin {
            payout: score_flat(&symbols, &self.paytable, bet),
            symbols,
        })
    }

    /// Analytic RTP: sum over paying combinations of the product of reel
    /// probabilities times the multiplier
    pub fn theoretical_rtp(&self) -> f64 {
        self.paytable
            .iter()
            .map(|(combo, multiplier)| {
                combo
                    .iter()
                    .map(|&s| self.sampler.probability(s))
                    .product::<f64>()
                    * multiplier
            })
            .sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PAYLINE MODE
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome of a payline spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpinOutcome {
    /// Line wins in credits (0 for a losing spin)
    Win(f64),
    /// Bonus triggered; line wins are superseded by the resolved award
    Bonus { award: f64 },
}

/// One payline spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaylineSpin {
    pub grid: Grid,
    pub evaluation: LineEvaluation,
    pub outcome: SpinOutcome,
}

impl PaylineSpin {
    /// Credits paid for this spin
    pub fn payout(&self) -> f64 {
        match self.outcome {
            SpinOutcome::Win(amount) => amount,
            SpinOutcome::Bonus { award } => award,
        }
    }

    pub fn bonus_triggered(&self) -> bool {
        matches!(self.outcome, SpinOutcome::Bonus { .. })
    }

    /// Hit keys: one per winning line, or a single bonus key
    pub fn win_keys(&self) -> Vec<WinKey> {
        if self.bonus_triggered() {
            vec![WinKey::Bonus]
        } else {
            self.evaluation
                .line_wins
                .iter()
                .map(|w| WinKey::Line(w.symbol))
                .collect()
        }
    }
}

/// Receives every spin of a batch play
pub trait SpinSink {
    fn record(&mut self, index: u64, spin: &PaylineSpin, symbols: &SymbolSet) -> std::io::Result<()>;
}

/// Discards spins
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SpinSink for NullSink {
    fn record(&mut self, _index: u64, _spin: &PaylineSpin, _symbols: &SymbolSet) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes one block per spin: a result line, then the grid, then a blank line
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SpinSink for ConsoleSink<W> {
    fn record(&mut self, index: u64, spin: &PaylineSpin, symbols: &SymbolSet) -> std::io::Result<()> {
        match spin.outcome {
            SpinOutcome::Bonus { award } => {
                writeln!(self.out, "Spin {index}: Bonus triggered! Win amount: {award}")?
            }
            SpinOutcome::Win(amount) => writeln!(self.out, "Spin {index}: Win amount: {amount}")?,
        }
        write!(self.out, "{}", spin.grid.render(symbols))?;
        writeln!(self.out)
    }
}

/// Totals of a batch play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaySummary {
    pub spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub bonus_spins: u64,
    /// `total_bet * target_rtp - total_win`: how far the batch ran behind
    /// (positive) or ahead (negative) of the configured return
    pub net_result: f64,
}

/// Reels × rows game scored on paylines with wild and bonus symbols
#[derive(Debug)]
pub struct PaylineGame {
    symbols: SymbolSet,
    sampler: WeightedSampler,
    evaluator: PaylineEvaluator,
    bonus: Box<dyn BonusResolver>,
    reels: usize,
    rows: usize,
    target_rtp: f64,
}

impl PaylineGame {
    /// Build with the default range bonus from the config
    pub fn new(config: &PaylineConfig) -> ConfigResult<Self> {
        let (min, max) = config.bonus_range;
        Self::with_bonus(config, Box::new(RangeBonus::new(min, max)?))
    }

    /// Build with a custom bonus resolver
    pub fn with_bonus(config: &PaylineConfig, bonus: Box<dyn BonusResolver>) -> ConfigResult<Self> {
        config.check_scalars()?;

        let defs = config
            .symbols
            .iter()
            .map(|n| SymbolDef::new(n.as_str(), SymbolRole::Normal))
            .chain(
                config
                    .premium_symbols
                    .iter()
                    .map(|n| SymbolDef::new(n.as_str(), SymbolRole::Premium)),
            )
            .chain([
                SymbolDef::new(config.wild_symbol.as_str(), SymbolRole::Wild),
                SymbolDef::new(config.bonus_symbol.as_str(), SymbolRole::Bonus),
            ])
            .collect();
        let symbols = SymbolSet::new(defs)?;

        let sampler = match &config.weights {
            Some(weights) => WeightedSampler::for_symbols(symbols.len(), weights)?,
            None => WeightedSampler::uniform(symbols.len())?,
        };

        let regular: Vec<SymbolId> = config
            .symbols
            .iter()
            .map(|n| symbols.require(n))
            .collect::<ConfigResult<_>>()?;
        let premium: Vec<SymbolId> = config
            .premium_symbols
            .iter()
            .map(|n| symbols.require(n))
            .collect::<ConfigResult<_>>()?;
        let paytable = LinePaytable::tiered(&symbols, &regular, &premium)?;

        let paylines = match &config.paylines {
            Some(lines) => lines
                .iter()
                .enumerate()
                .map(|(i, rows)| Payline::from_rows(i, rows))
                .collect(),
            None => default_paylines(config.reels, config.rows),
        };
        validate_paylines(&paylines, config.reels, config.rows)?;

        let wild = symbols.require(&config.wild_symbol)?;
        let bonus_symbol = symbols.require(&config.bonus_symbol)?;

        log::debug!(
            "payline game: {}x{} grid, {} symbols, {} lines",
            config.reels,
            config.rows,
            symbols.len(),
            paylines.len()
        );

        Ok(Self {
            evaluator: PaylineEvaluator::new(paylines, paytable, wild, bonus_symbol, config.bonus_threshold),
            symbols,
            sampler,
            bonus,
            reels: config.reels,
            rows: config.rows,
            target_rtp: config.target_rtp,
        })
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn sampler(&self) -> &WeightedSampler {
        &self.sampler
    }

    pub fn evaluator(&self) -> &PaylineEvaluator {
        &self.evaluator
    }

    pub fn reels(&self) -> usize {
        self.reels
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn target_rtp(&self) -> f64 {
        self.target_rtp
    }

    /// Score a given grid. A triggered bonus draws its award from `source`.
    pub fn settle(&self, grid: Grid, source: &mut EntropySource, bet: f64) -> SpinResult<PaylineSpin> {
        let evaluation = self.evaluator.evaluate(&grid);
        let outcome = if evaluation.bonus_triggered {
            SpinOutcome::Bonus {
                award: self.bonus.resolve(source)? * bet,
            }
        } else {
            SpinOutcome::Win(evaluation.line_total * bet)
        };
        Ok(PaylineSpin {
            grid,
            evaluation,
            outcome,
        })
    }

    /// Spin a fresh grid and settle it
    pub fn spin(&self, source: &mut EntropySource, bet: f64) -> SpinResult<PaylineSpin> {
        validate_bet(bet)?;
        let grid = spin_grid(source, &self.sampler, self.reels, self.rows)?;
        self.settle(grid, source, bet)
    }

    /// Play `spins` spins in sequence, reporting each one to `sink`
    pub fn play_spins(
        &self,
        source: &mut EntropySource,
        bet: f64,
        spins: u64,
        sink: &mut dyn SpinSink,
    ) -> SpinResult<PlaySummary> {
        validate_bet(bet)?;
        let mut total_win = 0.0;
        let mut bonus_spins = 0;
        for index in 1..=spins {
            let spin = self.spin(source, bet)?;
            total_win += spin.payout();
            if spin.bonus_triggered() {
                bonus_spins += 1;
            }
            sink.record(index, &spin, &self.symbols)?;
        }

        let total_bet = bet * spins as f64;
        Ok(PlaySummary {
            spins,
            total_bet,
            total_win,
            bonus_spins,
            net_result: total_bet * self.target_rtp - total_win,
        })
    }
}
