//! Fourier coefficient computation, synthesis and convergence analysis.
//!
//! This crate provides:
//! - Trigonometric Fourier coefficients by trapezoidal quadrature
//! - Selective and progressive synthesis from (masked) coefficients
//! - Spectrum, THD and harmonic power breakdown
//! - Convergence metrics (RMS error, SNR, power capture)
//! - A thread-safe coefficient cache and computation budgets
//!
//! All operations are pure functions of their inputs; the only retained
//! state is an optional [`CoefficientCache`].

pub mod budget;
pub mod cache;
pub mod coefficients;
pub mod convergence;
pub mod error;
pub mod export;
pub mod mask;
pub mod quadrature;
pub mod spectral;
pub mod synthesis;

pub use budget::ComputationBudget;
pub use cache::{CacheStats, CoefficientCache};
pub use coefficients::{
    CoefficientOptions, FourierCoefficients, MAX_HARMONICS, compute_coefficients,
    compute_coefficients_with,
};
pub use convergence::{
    ConvergenceMetrics, ConvergencePoint, analyze_convergence, analyze_convergence_masked,
};
pub use error::{Error, Result};
pub use export::{AnalysisExport, export_analysis};
pub use mask::HarmonicMask;
pub use quadrature::QuadratureConfig;
pub use spectral::{
    HarmonicAnalysis, HarmonicInfo, SpectralLine, harmonic_analysis, spectrum,
    total_harmonic_distortion,
};
pub use synthesis::{ProgressiveSynthesis, ReconstructedSignal, synthesize, synthesize_progressive};
