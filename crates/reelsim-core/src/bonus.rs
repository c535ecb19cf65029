//! Bonus feature resolution

use std::fmt;

use crate::entropy::{EntropyResult, EntropySource};
use crate::error::{ConfigError, ConfigResult};

/// Resolves the award for a spin that triggered the bonus feature.
///
/// Awards are bet multiples. Implementations draw any randomness they need
/// from the spin's own entropy source.
pub trait BonusResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, source: &mut EntropySource) -> EntropyResult<f64>;

    /// Mean award, when it is known in closed form
    fn expected_award(&self) -> Option<f64> {
        None
    }
}

/// Uniform integer award in `min..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBonus {
    min: u32,
    max: u32,
}

impl RangeBonus {
    pub fn new(min: u32, max: u32) -> ConfigResult<Self> {
        if min > max {
            return Err(ConfigError::InvalidRange(format!(
                "bonus range {min}..={max} is empty"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Default for RangeBonus {
    fn default() -> Self {
        Self { min: 100, max: 500 }
    }
}

impl BonusResolver for RangeBonus {
    fn resolve(&self, source: &mut EntropySource) -> EntropyResult<f64> {
        Ok(source.random_in_range(self.min, self.max)? as f64)
    }

    fn expected_award(&self) -> Option<f64> {
        Some((self.min as f64 + self.max as f64) / 2.0)
    }
}

/// Fixed award, handy for tests and flat feature pricing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBonus(f64);

impl FixedBonus {
    /// Award must be finite and non-negative
    pub fn new(award: f64) -> ConfigResult<Self> {
        if award.is_finite() && award >= 0.0 {
            Ok(Self(award))
        } else {
            Err(ConfigError::InvalidValue {
                field: "bonus award",
                value: award,
            })
        }
    }

    pub fn award(&self) -> f64 {
        self.0
    }
}

impl BonusResolver for FixedBonus {
    fn resolve(&self, _source: &mut EntropySource) -> EntropyResult<f64> {
        Ok(self.0)
    }

    fn expected_award(&self) -> Option<f64> {
        Some(self.0)
    }
}
