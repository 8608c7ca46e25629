//! Error types for fourier-engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("computation aborted after {completed} of {requested} harmonics: {reason}")]
    ComputationAborted {
        completed: usize,
        requested: usize,
        reason: String,
    },

    #[error(transparent)]
    Signal(#[from] fourier_signal::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
