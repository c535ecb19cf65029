//! Win evaluation: flat tuple lookup and payline scoring

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::payline::Payline;
use crate::paytable::{Combination, ComboPaytable, LinePaytable};
use crate::symbols::{SymbolId, SymbolSet};

/// Key a hit is counted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WinKey {
    /// Exact flat-mode combination
    Combination(Combination),
    /// Payline won by this symbol
    Line(SymbolId),
    /// Bonus feature triggered
    Bonus,
}

impl WinKey {
    /// Human readable label, e.g. "Bar-Bar-Bar", "line:P1", "BONUS"
    pub fn label(&self, symbols: &SymbolSet) -> String {
        match self {
            WinKey::Combination(combo) => combo
                .iter()
                .map(|&s| symbols.name(s))
                .collect::<Vec<_>>()
                .join("-"),
            WinKey::Line(symbol) => format!("line:{}", symbols.name(*symbol)),
            WinKey::Bonus => "BONUS".to_string(),
        }
    }
}

/// Flat-mode payout: `paytable[combination] * bet`, or 0 for an unknown
/// combination
pub fn score_flat(combination: &Combination, paytable: &ComboPaytable, bet: f64) -> f64 {
    paytable.get(combination).map_or(0.0, |m| m * bet)
}

/// Score one line of symbols.
///
/// With a wild present, the line wins `paytable[s] * wilds` when every
/// non-wild entry is the same symbol `s`. A line made only of wilds does not
/// win. Without a wild the line wins `paytable[s]` when all entries are `s`.
/// Symbols absent from the paytable score nothing.
pub fn score_line(line: &[SymbolId], paytable: &LinePaytable, wild: SymbolId) -> Option<(SymbolId, u32, f64)> {
    let mut wilds = 0u32;
    let mut matched: Option<SymbolId> = None;
    for &symbol in line {
        if symbol == wild {
            wilds += 1;
            continue;
        }
        match matched {
            None => matched = Some(symbol),
            Some(m) if m == symbol => {}
            Some(_) => return None,
        }
    }

    let symbol = matched?;
    let base = paytable.get(symbol)?;
    let payout = if wilds > 0 { base * wilds as f64 } else { base };
    (payout > 0.0).then_some((symbol, wilds, payout))
}

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline index
    pub line_index: usize,
    /// Winning symbol
    pub symbol: SymbolId,
    /// Wilds on the line
    pub wilds: u32,
    /// Paytable multiplier, times the wild count when wilds are present
    pub multiplier: f64,
}

/// Result of evaluating a grid against the payline set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineEvaluation {
    /// Line wins
    pub line_wins: Vec<LineWin>,
    /// Sum of line multipliers
    pub line_total: f64,
    /// Bonus symbols anywhere on the grid
    pub bonus_count: usize,
    /// Bonus count reached the trigger threshold
    pub bonus_triggered: bool,
}

/// Payline evaluator with wild substitution and grid-wide bonus counting
#[derive(Debug, Clone)]
pub struct PaylineEvaluator {
    paylines: Vec<Payline>,
    paytable: LinePaytable,
    wild: SymbolId,
    bonus: SymbolId,
    bonus_threshold: usize,
}

impl PaylineEvaluator {
    pub fn new(
        paylines: Vec<Payline>,
        paytable: LinePaytable,
        wild: SymbolId,
        bonus: SymbolId,
        bonus_threshold: usize,
    ) -> Self {
        Self {
            paylines,
            paytable,
            wild,
            bonus,
            bonus_threshold,
        }
    }

    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    pub fn paytable(&self) -> &LinePaytable {
        &self.paytable
    }

    pub fn wild(&self) -> SymbolId {
        self.wild
    }

    pub fn bonus(&self) -> SymbolId {
        self.bonus
    }

    pub fn bonus_threshold(&self) -> usize {
        self.bonus_threshold
    }

    /// Score every payline and count bonus symbols.
    ///
    /// Line totals are in bet multiples. Whether a triggered bonus replaces
    /// the line total is decided by the caller.
    pub fn evaluate(&self, grid: &Grid) -> LineEvaluation {
        let mut line_wins = Vec::new();
        let mut line = Vec::with_capacity(grid.reels());

        for payline in &self.paylines {
            line.clear();
            line.extend(
                payline
                    .cells
                    .iter()
                    .filter_map(|&(reel, row)| grid.get(reel, row)),
            );
            if line.len() != payline.len() {
                continue;
            }
            if let Some((symbol, wilds, multiplier)) = score_line(&line, &self.paytable, self.wild) {
                line_wins.push(LineWin {
                    line_index: payline.index,
                    symbol,
                    wilds,
                    multiplier,
                });
            }
        }

        let bonus_count = grid.count(self.bonus);
        LineEvaluation {
            line_total: line_wins.iter().map(|w| w.multiplier).sum(),
            line_wins,
            bonus_count,
            bonus_triggered: bonus_count >= self.bonus_threshold,
        }
    }
}
