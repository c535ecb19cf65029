//! Error types for simulation runs

use thiserror::Error;

use reelsim_core::SpinError;

use crate::report::IncompleteResult;

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to build worker pool: {0}")]
    Pool(String),

    #[error("Partition {partition} failed: {reason}")]
    WorkerFailed {
        partition: usize,
        reason: String,
        partial: Box<IncompleteResult>,
    },

    #[error("Simulation cancelled after {} spins", .partial.spins)]
    Cancelled { partial: Box<IncompleteResult> },
}

impl SimulationError {
    /// Completed work carried by a failed or cancelled run
    pub fn partial(&self) -> Option<&IncompleteResult> {
        match self {
            SimulationError::WorkerFailed { partial, .. } | SimulationError::Cancelled { partial } => {
                Some(partial)
            }
            _ => None,
        }
    }
}

impl From<SpinError> for SimulationError {
    fn from(e: SpinError) -> Self {
        SimulationError::InvalidInput(e.to_string())
    }
}

/// Result type for simulation runs
pub type SimResult<T> = Result<T, SimulationError>;
