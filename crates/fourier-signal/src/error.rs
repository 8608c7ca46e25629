//! Error types for fourier-signal.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Custom function text could not be parsed into the restricted grammar.
    #[error("invalid expression '{expression}': {message}")]
    Expression { expression: String, message: String },

    /// A function failed while being evaluated at a specific sample.
    #[error("evaluation of '{expression}' failed at t = {time}: {message}")]
    Evaluation {
        expression: String,
        time: f64,
        message: String,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
