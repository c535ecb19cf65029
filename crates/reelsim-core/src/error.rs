//! Error types for the slot core

use thiserror::Error;

/// Entropy source failures. Always fatal for the spin that hit them.
#[derive(Error, Debug)]
pub enum EntropyError {
    #[error("OS entropy unavailable: {0}")]
    Unavailable(String),

    #[error("Keystream counter exhausted: counter {counter} cannot advance by {blocks} blocks")]
    CounterExhausted { counter: u64, blocks: u64 },
}

/// Configuration errors, raised at construction time only
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Symbol set is empty")]
    EmptySymbols,

    #[error("Weight count mismatch: {symbols} symbols, {weights} weights")]
    WeightCountMismatch { symbols: usize, weights: usize },

    #[error("Invalid weight {weight} at index {index}")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("Weights must sum to a positive finite total, got {0}")]
    NonPositiveTotal(f64),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Invalid multiplier {value} for {key}")]
    InvalidMultiplier { key: String, value: f64 },

    #[error("Invalid payline {index}: {reason}")]
    InvalidPayline { index: usize, reason: String },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors raised while playing a spin
#[derive(Error, Debug)]
pub enum SpinError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient balance: {balance} available, {bet} required")]
    InsufficientBalance { balance: f64, bet: f64 },

    #[error("Entropy error: {0}")]
    Entropy(#[from] EntropyError),

    #[error("Spin sink error: {0}")]
    Sink(#[from] std::io::Error),
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for spins
pub type SpinResult<T> = Result<T, SpinError>;

/// Reject bets that are non-positive or not finite
pub fn validate_bet(bet: f64) -> SpinResult<()> {
    if bet.is_finite() && bet > 0.0 {
        Ok(())
    } else {
        Err(SpinError::InvalidInput(format!(
            "bet must be a positive finite number, got {bet}"
        )))
    }
}
