//! Serializable snapshot of a complete analysis.

use serde::Serialize;

use crate::coefficients::FourierCoefficients;
use crate::convergence::{ConvergenceMetrics, analyze_convergence_masked};
use crate::error::Result;
use crate::mask::HarmonicMask;
use crate::spectral::{HarmonicAnalysis, SpectralLine, harmonic_analysis, spectrum};
use crate::synthesis::synthesize;

/// Everything needed to reproduce a plot or table of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisExport {
    pub period: f64,
    pub time: Vec<f64>,
    pub original_signal: Vec<f64>,
    pub reconstructed_signal: Vec<f64>,
    pub coefficients: FourierCoefficients,
    pub mask: HarmonicMask,
    pub spectrum: Vec<SpectralLine>,
    pub analysis: HarmonicAnalysis,
    pub metrics: ConvergenceMetrics,
}

/// Reconstruct with `mask` and gather spectrum, harmonic analysis and metrics.
pub fn export_analysis(
    original: &[f64],
    coefficients: &FourierCoefficients,
    mask: &HarmonicMask,
    time_grid: &[f64],
    period: f64,
) -> Result<AnalysisExport> {
    let metrics = analyze_convergence_masked(original, coefficients, mask, time_grid, period)?;
    let reconstructed = synthesize(coefficients, mask, time_grid, period)?;
    Ok(AnalysisExport {
        period,
        time: reconstructed.time,
        original_signal: original.to_vec(),
        reconstructed_signal: reconstructed.values,
        coefficients: coefficients.clone(),
        mask: mask.clone(),
        spectrum: spectrum(coefficients, mask)?,
        analysis: harmonic_analysis(coefficients, mask)?,
        metrics,
    })
}
