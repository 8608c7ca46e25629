//! Spectral views of a coefficient set.
//!
//! # Features
//!
//! - **Spectrum** - Magnitude and phase of each enabled harmonic
//! - **THD Computation** - Harmonic distortion relative to the fundamental
//! - **Harmonic Analysis** - Power breakdown and dominant harmonics
//!
//! # Example
//!
//! ```
//! use fourier_engine::spectral::{spectrum, total_harmonic_distortion};
//! use fourier_engine::{FourierCoefficients, HarmonicMask};
//!
//! let coefficients = FourierCoefficients::new(0.0, &[0.0, 0.0, 0.0], &[1.0, 0.0, 0.25]).unwrap();
//! let mask = HarmonicMask::all(3);
//!
//! let lines = spectrum(&coefficients, &mask).unwrap();
//! assert_eq!(lines.len(), 3);
//!
//! let thd = total_harmonic_distortion(&coefficients, &mask).unwrap();
//! assert!((thd - 25.0).abs() < 1e-9);
//! ```

mod spectrum;
mod thd;

pub use spectrum::{SpectralLine, spectrum};
pub use thd::{HarmonicAnalysis, HarmonicInfo, harmonic_analysis, total_harmonic_distortion};
