//! # Fourier
//!
//! Truncated Fourier series analysis of periodic waveforms.
//!
//! Fourier provides:
//! - Built-in waveform families and sandboxed custom expressions in `t`
//! - Trigonometric coefficients `a0`, `a[k]`, `b[k]` by numerical integration
//! - Selective (masked) and progressive harmonic synthesis
//! - Spectrum, THD and convergence metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use fourier::prelude::*;
//!
//! let period = 1.0;
//! let square = Signal::square(period, 1.0).unwrap();
//! let coefficients = compute_coefficients(&square, period, 15).unwrap();
//!
//! // b[1] of a unit square wave is 4/π
//! assert!((coefficients.b(1) - 4.0 / std::f64::consts::PI).abs() < 1e-2);
//!
//! let grid = period_grid(period, 500).unwrap();
//! let original = square.sample(&grid).unwrap();
//! let metrics = analyze_convergence(&original, &coefficients, &grid, period).unwrap();
//! assert!(metrics.final_point().snr_db > 10.0);
//! ```
//!
//! ## Masks and Progressive Build-up
//!
//! ```rust
//! use fourier::prelude::*;
//!
//! let triangle = Signal::new(WaveformKind::Triangle, 2.0, 1.0, &ExtraParams::default()).unwrap();
//! let coefficients = compute_coefficients(&triangle, 2.0, 9).unwrap();
//! let grid = linspace(0.0, 4.0, 200, true).unwrap();
//!
//! let mut mask = HarmonicMask::all(9);
//! mask.disable(1).unwrap();
//! let without_fundamental = synthesize(&coefficients, &mask, &grid, 2.0).unwrap();
//! assert_eq!(without_fundamental.len(), 200);
//!
//! // One frame per prefix length, DC-only first
//! let frames = synthesize_progressive(&coefficients, &grid, 2.0).unwrap();
//! assert_eq!(frames.len(), 10);
//! ```

// Re-export component crates
pub use fourier_engine as engine;
pub use fourier_signal as signal;

// ============================================================================
// Convenient re-exports from fourier_signal
// ============================================================================

pub use fourier_signal::{
    // Errors
    Error as SignalError,
    // Expressions
    Expression,
    ExtraParams,
    FnSignal,
    FunctionKey,
    // Evaluator contract
    PeriodicFunction,
    // Waveforms
    Signal,
    WaveformKind,
    generate,
    // Time grids
    linspace,
    period_grid,
};

// ============================================================================
// Convenient re-exports from fourier_engine
// ============================================================================

pub use fourier_engine::{
    AnalysisExport,
    CacheStats,
    // Coefficients
    CoefficientCache,
    CoefficientOptions,
    ComputationBudget,
    // Convergence
    ConvergenceMetrics,
    ConvergencePoint,
    // Errors
    Error as EngineError,
    FourierCoefficients,
    HarmonicAnalysis,
    HarmonicMask,
    MAX_HARMONICS,
    ProgressiveSynthesis,
    QuadratureConfig,
    // Synthesis
    ReconstructedSignal,
    // Spectrum
    SpectralLine,
    analyze_convergence,
    analyze_convergence_masked,
    compute_coefficients,
    compute_coefficients_with,
    export_analysis,
    harmonic_analysis,
    spectrum,
    synthesize,
    synthesize_progressive,
    total_harmonic_distortion,
};

/// Re-export of num_complex's 64-bit complex type, as returned by
/// [`FourierCoefficients::phasor`].
pub use num_complex::Complex64;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types and traits.
///
/// ```rust
/// use fourier::prelude::*;
/// ```
pub mod prelude {
    // Signals
    pub use crate::{ExtraParams, FnSignal, PeriodicFunction, Signal, WaveformKind};
    pub use crate::{linspace, period_grid};

    // Coefficients
    pub use crate::{FourierCoefficients, compute_coefficients};

    // Synthesis
    pub use crate::{HarmonicMask, ReconstructedSignal, synthesize, synthesize_progressive};

    // Analysis
    pub use crate::{ConvergenceMetrics, SpectralLine, analyze_convergence, spectrum};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_through_reexports() {
        let signal = Signal::custom("cos(2*pi*t)", 1.0, 2.0).unwrap();
        let coefficients = compute_coefficients(&signal, 1.0, 3).unwrap();
        let z: Complex64 = coefficients.phasor(1);
        assert!((z.re - 2.0).abs() < 1e-9);

        let lines = spectrum(&coefficients, &HarmonicMask::all(3)).unwrap();
        assert!((lines[0].magnitude - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_errors_are_distinguishable() {
        let err = compute_coefficients(&FnSignal::new(|t: f64| t), 1.0, 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));

        let err = Expression::parse("t +").unwrap_err();
        assert!(matches!(err, SignalError::Expression { .. }));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let f = FnSignal::labeled("ramp", |t: f64| t);
        assert!(f.cache_key().is_some());
        let _: HarmonicMask = HarmonicMask::none(4);
    }
}
