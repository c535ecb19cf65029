//! Paytables: ordered-tuple payouts for flat play, per-symbol payouts for lines

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::symbols::{SymbolId, SymbolSet};

/// Reels in flat mode
pub const FLAT_REELS: usize = 3;

/// Exact ordered combination for flat play
pub type Combination = [SymbolId; FLAT_REELS];

/// Declarative flat paytable row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboPay {
    /// Symbol names, left to right
    pub combination: [String; FLAT_REELS],
    /// Bet multiplier
    pub multiplier: f64,
}

impl ComboPay {
    pub fn new(combination: [&str; FLAT_REELS], multiplier: f64) -> Self {
        Self {
            combination: combination.map(str::to_string),
            multiplier,
        }
    }

    /// Three of the same symbol
    pub fn triple(symbol: &str, multiplier: f64) -> Self {
        Self::new([symbol; FLAT_REELS], multiplier)
    }
}

fn check_multiplier(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidMultiplier {
            key: key.to_string(),
            value,
        })
    }
}

/// Ordered-tuple paytable. Order matters; there is no permutation credit.
#[derive(Debug, Clone, Default)]
pub struct ComboPaytable {
    entries: HashMap<Combination, f64>,
}

impl ComboPaytable {
    /// Resolve declarative rows against an alphabet
    pub fn build(symbols: &SymbolSet, rows: &[ComboPay]) -> ConfigResult<Self> {
        let mut entries = HashMap::with_capacity(rows.len());
        for row in rows {
            let key = row.combination.join(",");
            check_multiplier(&key, row.multiplier)?;
            let mut combination = [SymbolId(0); FLAT_REELS];
            for (slot, name) in combination.iter_mut().zip(&row.combination) {
                *slot = symbols.require(name)?;
            }
            entries.insert(combination, row.multiplier);
        }
        Ok(Self { entries })
    }

    /// Multiplier for an exact combination; unknown combinations are `None`
    pub fn get(&self, combination: &Combination) -> Option<f64> {
        self.entries.get(combination).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Combination, f64)> + '_ {
        self.entries.iter().map(|(k, &v)| (k, v))
    }
}

/// Per-symbol line paytable
#[derive(Debug, Clone)]
pub struct LinePaytable {
    multipliers: Vec<Option<f64>>,
}

impl LinePaytable {
    /// Empty table sized for an alphabet
    pub fn empty(symbols: &SymbolSet) -> Self {
        Self {
            multipliers: vec![None; symbols.len()],
        }
    }

    /// Set or replace one symbol's multiplier
    pub fn set(&mut self, symbols: &SymbolSet, id: SymbolId, multiplier: f64) -> ConfigResult<()> {
        check_multiplier(symbols.name(id), multiplier)?;
        match self.multipliers.get_mut(id.index()) {
            Some(slot) => {
                *slot = Some(multiplier);
                Ok(())
            }
            None => Err(ConfigError::UnknownSymbol(format!("#{}", id.0))),
        }
    }

    /// Tiered table: every regular and premium symbol pays `(i + 1) * 10` in
    /// listing order, then premiums are repriced to `(i + 1) * 50`.
    ///
    /// Wild and bonus symbols are left out and score zero on a line.
    pub fn tiered(symbols: &SymbolSet, regular: &[SymbolId], premium: &[SymbolId]) -> ConfigResult<Self> {
        let mut table = Self::empty(symbols);
        for (i, &id) in regular.iter().chain(premium).enumerate() {
            table.set(symbols, id, ((i + 1) * 10) as f64)?;
        }
        for (i, &id) in premium.iter().enumerate() {
            table.set(symbols, id, ((i + 1) * 50) as f64)?;
        }
        Ok(table)
    }

    /// Multiplier for a symbol; symbols without an entry are `None`
    pub fn get(&self, id: SymbolId) -> Option<f64> {
        self.multipliers.get(id.index()).copied().flatten()
    }

    /// Symbols that have an entry
    pub fn paying(&self) -> impl Iterator<Item = (SymbolId, f64)> + '_ {
        self.multipliers
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.map(|m| (SymbolId(i as u16), m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{SymbolDef, SymbolRole};

    #[test]
    fn test_combo_build_and_lookup() {
        let symbols = SymbolSet::from_names(&["Cherry", "Lemon"]).unwrap();
        let table = ComboPaytable::build(
            &symbols,
            &[
                ComboPay::triple("Cherry", 4.0),
                ComboPay::new(["Cherry", "Lemon", "Cherry"], 1.5),
            ],
        )
        .unwrap();

        let c = SymbolId(0);
        let l = SymbolId(1);
        assert_eq!(table.get(&[c, c, c]), Some(4.0));
        assert_eq!(table.get(&[c, l, c]), Some(1.5));
        assert_eq!(table.get(&[c, c, l]), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_combo_rejects_unknown_and_negative() {
        let symbols = SymbolSet::from_names(&["Cherry"]).unwrap();
        assert!(matches!(
            ComboPaytable::build(&symbols, &[ComboPay::triple("Bar", 1.0)]),
            Err(ConfigError::UnknownSymbol(name)) if name == "Bar"
        ));
        assert!(matches!(
            ComboPaytable::build(&symbols, &[ComboPay::triple("Cherry", -1.0)]),
            Err(ConfigError::InvalidMultiplier { .. })
        ));
    }

    #[test]
    fn test_tiered_pricing() {
        let symbols = SymbolSet::new(vec![
            SymbolDef::new("A", SymbolRole::Normal),
            SymbolDef::new("K", SymbolRole::Normal),
            SymbolDef::new("P1", SymbolRole::Premium),
            SymbolDef::new("P2", SymbolRole::Premium),
            SymbolDef::new("W", SymbolRole::Wild),
        ])
        .unwrap();
        let table = LinePaytable::tiered(
            &symbols,
            &[SymbolId(0), SymbolId(1)],
            &[SymbolId(2), SymbolId(3)],
        )
        .unwrap();

        assert_eq!(table.get(SymbolId(0)), Some(10.0));
        assert_eq!(table.get(SymbolId(1)), Some(20.0));
        assert_eq!(table.get(SymbolId(2)), Some(50.0));
        assert_eq!(table.get(SymbolId(3)), Some(100.0));
        assert_eq!(table.get(SymbolId(4)), None);
        assert_eq!(table.paying().count(), 4);
    }
}
