//! Game configuration
//!
//! Declarative, serde-friendly descriptions of the two game modes. Games are
//! built from these once; the built games are immutable.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::paytable::ComboPay;

/// A symbol and its sampling weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSymbol {
    pub name: String,
    pub weight: f64,
}

impl WeightedSymbol {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Flat 3-reel, single-row game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatConfig {
    /// Alphabet with per-reel sampling weights
    pub symbols: Vec<WeightedSymbol>,
    /// Exact-combination paytable
    pub paytable: Vec<ComboPay>,
}

impl FlatConfig {
    /// Classic fruit machine: seven symbols, three-of-a-kind pays
    pub fn classic() -> Self {
        let symbols = [
            ("Cherry", 0.3),
            ("Lemon", 0.25),
            ("Orange", 0.16),
            ("Plum", 0.13),
            ("Bell", 0.1),
            ("Bar", 0.035),
            ("Seven", 0.025),
        ];
        let pays = [
            ("Cherry", 4.0),
            ("Lemon", 10.0),
            ("Orange", 30.0),
            ("Plum", 50.0),
            ("Bell", 200.0),
            ("Bar", 3000.0),
            ("Seven", 8000.0),
        ];
        Self {
            symbols: symbols
                .iter()
                .map(|&(name, weight)| WeightedSymbol::new(name, weight))
                .collect(),
            paytable: pays
                .iter()
                .map(|&(name, multiplier)| ComboPay::triple(name, multiplier))
                .collect(),
        }
    }

    /// Builder: replace one combination's multiplier, adding it if absent
    pub fn with_pay(mut self, pay: ComboPay) -> Self {
        match self
            .paytable
            .iter_mut()
            .find(|p| p.combination == pay.combination)
        {
            Some(existing) => existing.multiplier = pay.multiplier,
            None => self.paytable.push(pay),
        }
        self
    }
}

impl Default for FlatConfig {
    fn default() -> Self {
        Self::classic()
    }
}

fn default_bonus_threshold() -> usize {
    3
}

fn default_bonus_range() -> (u32, u32) {
    (100, 500)
}

/// Multi-reel payline game with wild and bonus symbols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaylineConfig {
    /// Number of reels (columns)
    pub reels: usize,
    /// Visible rows per reel
    pub rows: usize,
    /// Regular symbols, lowest paying first
    pub symbols: Vec<String>,
    /// Premium symbols, lowest paying first
    pub premium_symbols: Vec<String>,
    pub wild_symbol: String,
    pub bonus_symbol: String,
    /// Sampling weights over regular, premium, wild, bonus (in that order).
    /// `None` draws every symbol with equal probability.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    /// Row index per reel for each line. `None` uses the default set for
    /// the grid shape.
    #[serde(default)]
    pub paylines: Option<Vec<Vec<usize>>>,
    /// Configured return used for the batch-play net result
    pub target_rtp: f64,
    /// Bonus symbols needed anywhere on the grid to trigger the feature
    #[serde(default = "default_bonus_threshold")]
    pub bonus_threshold: usize,
    /// Inclusive bonus award range, in bet multiples
    #[serde(default = "default_bonus_range")]
    pub bonus_range: (u32, u32),
}

impl PaylineConfig {
    /// 6 reels × 5 rows, A K Q J 10 9 with three premiums, 96.4% target
    pub fn six_by_five() -> Self {
        Self {
            reels: 6,
            rows: 5,
            symbols: ["A", "K", "Q", "J", "10", "9"].map(String::from).to_vec(),
            premium_symbols: ["P1", "P2", "P3"].map(String::from).to_vec(),
            wild_symbol: "W".into(),
            bonus_symbol: "B".into(),
            weights: None,
            paylines: None,
            target_rtp: 0.964,
            bonus_threshold: default_bonus_threshold(),
            bonus_range: default_bonus_range(),
        }
    }

    /// Builder: set sampling weights
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Builder: set explicit paylines
    pub fn with_paylines(mut self, paylines: Vec<Vec<usize>>) -> Self {
        self.paylines = Some(paylines);
        self
    }

    /// Builder: set bonus trigger threshold
    pub fn with_bonus_threshold(mut self, threshold: usize) -> Self {
        self.bonus_threshold = threshold;
        self
    }

    /// Symbol names in alphabet order: regular, premium, wild, bonus
    pub fn alphabet(&self) -> Vec<&str> {
        self.symbols
            .iter()
            .chain(&self.premium_symbols)
            .map(String::as_str)
            .chain([self.wild_symbol.as_str(), self.bonus_symbol.as_str()])
            .collect()
    }

    pub(crate) fn check_scalars(&self) -> ConfigResult<()> {
        if self.reels == 0 || self.rows == 0 {
            return Err(ConfigError::InvalidGeometry(format!(
                "{}x{} grid",
                self.reels, self.rows
            )));
        }
        if !self.target_rtp.is_finite() || self.target_rtp < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "target_rtp",
                value: self.target_rtp,
            });
        }
        if self.bonus_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bonus_threshold",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for PaylineConfig {
    fn default() -> Self {
        Self::six_by_five()
    }
}

/// Both game modes, as loaded from a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub flat: FlatConfig,
    #[serde(default)]
    pub lines: PaylineConfig,
}

impl GameConfig {
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        serde_yml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
