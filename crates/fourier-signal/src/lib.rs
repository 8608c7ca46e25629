//! Periodic signal sources for Fourier analysis.
//!
//! This crate provides:
//! - Waveform families: square, triangle, sawtooth, half-wave rectified sine,
//!   pulse train, and custom expressions in `t`
//! - A sandboxed expression parser/evaluator for custom functions
//! - Time grid helpers
//! - The [`PeriodicFunction`] evaluator trait consumed by `fourier-engine`

pub mod error;
pub mod expression;
pub mod function;
pub mod time_grid;
pub mod waveforms;

pub use error::{Error, Result};
pub use expression::{Expr, Expression, Function, parse_expression};
pub use function::{FnSignal, FunctionKey, PeriodicFunction};
pub use time_grid::{linspace, period_grid, validate_time_grid};
pub use waveforms::{
    DEFAULT_DUTY_CYCLE, ExtraParams, Signal, Waveform, WaveformKind, generate,
};
