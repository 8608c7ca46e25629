//! How quickly partial sums approach the original signal.

use serde::Serialize;

use crate::coefficients::FourierCoefficients;
use crate::error::{Error, Result};
use crate::mask::HarmonicMask;
use crate::spectral::total_harmonic_distortion;
use crate::synthesis::{add_harmonic, validate_inputs};

/// Floor applied to both powers in the SNR ratio.
const POWER_FLOOR: f64 = 1e-12;

/// Error metrics for the partial sum with `harmonics` terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergencePoint {
    /// Prefix length `n`; 0 is the DC-only reconstruction.
    pub harmonics: usize,
    /// `√mean((x − x̂ₙ)²)`.
    pub rms_error: f64,
    /// `max|x − x̂ₙ|`.
    pub max_error: f64,
    /// `10·log10(P_signal / P_error)` with both powers floored at `1e-12`.
    pub snr_db: f64,
    /// Share of the series power captured by DC plus harmonics `1..=n`.
    pub power_capture_fraction: f64,
}

/// Convergence of a series towards the sampled original.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceMetrics {
    /// DC-only reconstruction `a0/2`, the same curve a selective synthesis
    /// with an empty mask draws. Its errors are measured from the mean level,
    /// not from zero, so a signal with a DC offset starts below `rms(x)`.
    pub baseline: ConvergencePoint,
    /// One point per prefix length `1..=N`.
    pub points: Vec<ConvergencePoint>,
    /// THD of the enabled harmonics, in percent.
    pub thd_percent: f64,
    /// `mean(x²)` of the original samples.
    pub signal_power: f64,
    /// Parseval power of the full series, `a0²/4 + Σ(a²+b²)/2`.
    pub total_power: f64,
    /// Largest absolute error of the full reconstruction, equal to
    /// `final_point().max_error`.
    pub max_error: f64,
    /// Full-reconstruction RMS error relative to the standard deviation of the original.
    pub relative_error: f64,
}

impl ConvergenceMetrics {
    /// Metrics at prefix length `n`, baseline included.
    pub fn point(&self, n: usize) -> Option<&ConvergencePoint> {
        if n == 0 {
            Some(&self.baseline)
        } else {
            self.points.get(n - 1)
        }
    }

    /// Metrics of the full reconstruction.
    pub fn final_point(&self) -> &ConvergencePoint {
        self.points.last().unwrap_or(&self.baseline)
    }

    /// Smallest prefix length whose power capture reaches `fraction`.
    pub fn harmonics_for_capture(&self, fraction: f64) -> Option<usize> {
        std::iter::once(&self.baseline)
            .chain(&self.points)
            .find(|p| p.power_capture_fraction >= fraction)
            .map(|p| p.harmonics)
    }
}

/// Convergence metrics with every harmonic enabled.
pub fn analyze_convergence(
    original: &[f64],
    coefficients: &FourierCoefficients,
    time_grid: &[f64],
    period: f64,
) -> Result<ConvergenceMetrics> {
    let mask = HarmonicMask::all(coefficients.harmonic_count());
    analyze_convergence_masked(original, coefficients, &mask, time_grid, period)
}

/// Convergence metrics where prefix `n` holds only the enabled harmonics among `1..=n`.
///
/// Power capture is measured against the whole series, so disabled
/// harmonics show up as capture that is never reached.
pub fn analyze_convergence_masked(
    original: &[f64],
    coefficients: &FourierCoefficients,
    mask: &HarmonicMask,
    time_grid: &[f64],
    period: f64,
) -> Result<ConvergenceMetrics> {
    if original.len() != time_grid.len() {
        return Err(Error::InvalidParameter(format!(
            "original has {} samples but the time grid has {}",
            original.len(),
            time_grid.len()
        )));
    }
    if time_grid.is_empty() {
        return Err(Error::InvalidParameter("time grid is empty".to_string()));
    }
    validate_inputs(time_grid, period)?;
    mask.check_matches(coefficients)?;

    let signal_power = mean_square(original.iter().copied());
    let total_power = coefficients.total_power();
    let capture = |captured: f64| {
        if total_power > 0.0 {
            captured / total_power
        } else {
            1.0
        }
    };

    let mut partial = vec![coefficients.dc_level(); time_grid.len()];
    let mut captured = coefficients.dc_power();
    let baseline = point_for(0, original, &partial, signal_power, capture(captured));

    let mut points = Vec::with_capacity(coefficients.harmonic_count());
    for k in 1..=coefficients.harmonic_count() {
        if mask.is_enabled(k) {
            add_harmonic(&mut partial, time_grid, coefficients, k, period);
            captured += coefficients.harmonic_power(k);
        }
        points.push(point_for(k, original, &partial, signal_power, capture(captured)));
    }

    let mean = original.iter().sum::<f64>() / original.len() as f64;
    let std_dev = mean_square(original.iter().map(|x| x - mean)).sqrt();
    let last = *points.last().unwrap_or(&baseline);

    let metrics = ConvergenceMetrics {
        baseline,
        points,
        thd_percent: total_harmonic_distortion(coefficients, mask)?,
        signal_power,
        total_power,
        max_error: last.max_error,
        relative_error: last.rms_error / (std_dev + POWER_FLOOR),
    };
    log::debug!(
        "convergence over {} harmonics: final rms {:.3e}, snr {:.1} dB",
        coefficients.harmonic_count(),
        metrics.final_point().rms_error,
        metrics.final_point().snr_db
    );
    Ok(metrics)
}

fn point_for(
    harmonics: usize,
    original: &[f64],
    reconstructed: &[f64],
    signal_power: f64,
    power_capture_fraction: f64,
) -> ConvergencePoint {
    let residuals = original.iter().zip(reconstructed).map(|(x, y)| x - y);
    let error_power = mean_square(residuals.clone());
    let max_error = residuals.map(f64::abs).fold(0.0, f64::max);
    ConvergencePoint {
        harmonics,
        rms_error: error_power.sqrt(),
        max_error,
        snr_db: 10.0 * (signal_power.max(POWER_FLOOR) / error_power.max(POWER_FLOOR)).log10(),
        power_capture_fraction,
    }
}

fn mean_square(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    values.map(|v| v * v).sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_series_converges() {
        let c = FourierCoefficients::new(0.0, &[0.0, 0.0], &[1.0, 0.5]).unwrap();
        let grid: Vec<f64> = (0..64).map(|i| i as f64 / 64.0).collect();
        let original: Vec<f64> = grid
            .iter()
            .map(|&t| {
                let w = std::f64::consts::TAU * t;
                w.sin() + 0.5 * (2.0 * w).sin()
            })
            .collect();

        let m = analyze_convergence(&original, &c, &grid, 1.0).unwrap();
        assert_eq!(m.points.len(), 2);
        assert_eq!(m.baseline.harmonics, 0);
        assert!(m.points[0].rms_error > m.points[1].rms_error);
        assert!(m.final_point().rms_error < 1e-12);
        assert!((m.final_point().power_capture_fraction - 1.0).abs() < 1e-12);
        assert!((m.points[0].power_capture_fraction - 0.8).abs() < 1e-12);
        assert!((m.thd_percent - 50.0).abs() < 1e-9);
        assert_eq!(m.harmonics_for_capture(0.95), Some(2));
        assert!(m.max_error < 1e-12);
        assert_eq!(m.max_error, m.final_point().max_error);
        let peak = original.iter().map(|x| x.abs()).fold(0.0, f64::max);
        assert!((m.baseline.max_error - peak).abs() < 1e-12);
    }

    #[test]
    fn test_zero_signal() {
        let c = FourierCoefficients::new(0.0, &[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]).unwrap();
        let grid = [0.0, 0.25, 0.5, 0.75];
        let m = analyze_convergence(&[0.0; 4], &c, &grid, 1.0).unwrap();
        for p in std::iter::once(&m.baseline).chain(&m.points) {
            assert_eq!(p.power_capture_fraction, 1.0);
            assert_eq!(p.rms_error, 0.0);
            assert_eq!(p.max_error, 0.0);
            assert_eq!(p.snr_db, 0.0);
        }
        assert_eq!(m.thd_percent, 0.0);
        assert_eq!(m.harmonics_for_capture(0.99), Some(0));
    }

    #[test]
    fn test_masked_prefix_skips_disabled() {
        let c = FourierCoefficients::new(0.0, &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let grid = [0.0, 0.125, 0.25];
        let original = [0.0; 3];
        let mask = HarmonicMask::from_flags(vec![false, true]);
        let m = analyze_convergence_masked(&original, &c, &mask, &grid, 1.0).unwrap();
        assert_eq!(m.points[0].rms_error, m.baseline.rms_error);
        assert!((m.points[1].power_capture_fraction - 0.5).abs() < 1e-12);
        assert_eq!(m.harmonics_for_capture(0.9), None);
    }

    #[test]
    fn test_length_mismatch() {
        let c = FourierCoefficients::new(0.0, &[1.0], &[0.0]).unwrap();
        let err = analyze_convergence(&[0.0, 1.0], &c, &[0.0], 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(analyze_convergence(&[], &c, &[], 1.0).is_err());
    }
}
