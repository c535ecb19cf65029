//! Weighted symbol sampling via inverse-CDF lookup

use crate::entropy::{EntropyResult, EntropySource, U32_DOMAIN};
use crate::error::{ConfigError, ConfigResult};
use crate::symbols::SymbolId;

/// Cumulative distribution over an alphabet.
///
/// Weights need not sum to 1; the cumulative table is normalised by the
/// weight total, so its last entry is 1 up to rounding.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    weights: Vec<f64>,
    cumulative: Vec<f64>,
    total: f64,
}

impl WeightedSampler {
    /// Build from one weight per symbol
    pub fn new(weights: &[f64]) -> ConfigResult<Self> {
        if weights.is_empty() {
            return Err(ConfigError::EmptySymbols);
        }
        if weights.len() > u16::MAX as usize {
            return Err(ConfigError::InvalidGeometry(format!(
                "{} weights exceed the alphabet limit",
                weights.len()
            )));
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|&(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(ConfigError::InvalidWeight { index, weight });
        }

        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(ConfigError::NonPositiveTotal(total));
        }

        let mut running = 0.0;
        let cumulative = weights
            .iter()
            .map(|w| {
                running += w;
                running / total
            })
            .collect();

        Ok(Self {
            weights: weights.to_vec(),
            cumulative,
            total,
        })
    }

    /// Build for a known alphabet size, checking the weight count
    pub fn for_symbols(symbol_count: usize, weights: &[f64]) -> ConfigResult<Self> {
        if symbol_count != weights.len() {
            return Err(ConfigError::WeightCountMismatch {
                symbols: symbol_count,
                weights: weights.len(),
            });
        }
        Self::new(weights)
    }

    /// Equal weight for every symbol
    pub fn uniform(symbol_count: usize) -> ConfigResult<Self> {
        Self::new(&vec![1.0; symbol_count])
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Normalised probability of a symbol
    pub fn probability(&self, id: SymbolId) -> f64 {
        self.weights
            .get(id.index())
            .map(|w| w / self.total)
            .unwrap_or(0.0)
    }

    /// First index whose cumulative value is >= `u`.
    ///
    /// Values at or past the final cumulative entry clamp to the last symbol.
    pub fn sample(&self, u: f64) -> SymbolId {
        let index = self.cumulative.partition_point(|&c| c < u);
        SymbolId(index.min(self.cumulative.len() - 1) as u16)
    }

    /// Map a raw entropy word to a symbol via `word / 2^32`
    pub fn sample_word(&self, word: u32) -> SymbolId {
        self.sample(word as f64 / U32_DOMAIN)
    }

    /// Element-wise [`Self::sample_word`] over a batch
    pub fn sample_batch(&self, words: &[u32]) -> Vec<SymbolId> {
        words.iter().map(|&w| self.sample_word(w)).collect()
    }

    /// Draw one symbol from fresh entropy
    pub fn draw(&self, source: &mut EntropySource) -> EntropyResult<SymbolId> {
        Ok(self.sample_word(source.next_u32()?))
    }
}
