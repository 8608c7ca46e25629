//! Trigonometric Fourier coefficients by numerical integration.
//!
//! For a function `f` with period `T` the engine computes
//!
//! ```text
//! a0   = (2/T) ∫₀ᵀ f(t) dt
//! a[k] = (2/T) ∫₀ᵀ f(t) cos(2πkt/T) dt
//! b[k] = (2/T) ∫₀ᵀ f(t) sin(2πkt/T) dt      k = 1..N
//! ```
//!
//! so that `f(t) ≈ a0/2 + Σ a[k] cos(2πkt/T) + b[k] sin(2πkt/T)`.

use std::f64::consts::TAU;

use fourier_signal::PeriodicFunction;
use num_complex::Complex64;
use serde::Serialize;

use crate::budget::ComputationBudget;
use crate::error::{Error, Result};
use crate::quadrature::{self, QuadratureConfig};

/// Largest supported harmonic count.
pub const MAX_HARMONICS: usize = 50;

/// Per-call options for [`compute_coefficients_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoefficientOptions {
    pub quadrature: QuadratureConfig,
    pub budget: Option<ComputationBudget>,
}

impl CoefficientOptions {
    pub fn with_quadrature(mut self, quadrature: QuadratureConfig) -> Self {
        self.quadrature = quadrature;
        self
    }

    pub fn with_budget(mut self, budget: ComputationBudget) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Coefficients `a0`, `a[1..=N]`, `b[1..=N]` of a truncated series.
///
/// The cosine and sine arrays keep a reserved slot at index 0 (always 0.0)
/// so harmonic `k` lives at index `k`. Instances are immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FourierCoefficients {
    a0: f64,
    #[serde(rename = "an")]
    cosine: Vec<f64>,
    #[serde(rename = "bn")]
    sine: Vec<f64>,
}

impl FourierCoefficients {
    /// Build from `a0` and the 1-based harmonic coefficients `a[0] = a1, ...`.
    pub fn new(a0: f64, a: &[f64], b: &[f64]) -> Result<Self> {
        if a.len() != b.len() {
            return Err(Error::InvalidParameter(format!(
                "cosine and sine coefficient counts differ ({} vs {})",
                a.len(),
                b.len()
            )));
        }
        validate_harmonic_count(a.len())?;
        if !a0.is_finite() || a.iter().chain(b).any(|c| !c.is_finite()) {
            return Err(Error::InvalidParameter(
                "coefficients must be finite".to_string(),
            ));
        }

        let mut cosine = Vec::with_capacity(a.len() + 1);
        cosine.push(0.0);
        cosine.extend_from_slice(a);
        let mut sine = Vec::with_capacity(b.len() + 1);
        sine.push(0.0);
        sine.extend_from_slice(b);
        Ok(Self { a0, cosine, sine })
    }

    /// The `a0` coefficient. The DC level of the series is `a0 / 2`.
    pub fn a0(&self) -> f64 {
        self.a0
    }

    /// DC level `a0 / 2`.
    pub fn dc_level(&self) -> f64 {
        self.a0 / 2.0
    }

    /// Cosine coefficient of harmonic `k`; zero for `k == 0` or `k > N`.
    pub fn a(&self, k: usize) -> f64 {
        self.cosine.get(k).copied().unwrap_or(0.0)
    }

    /// Sine coefficient of harmonic `k`; zero for `k == 0` or `k > N`.
    pub fn b(&self, k: usize) -> f64 {
        self.sine.get(k).copied().unwrap_or(0.0)
    }

    /// Number of harmonics `N`.
    pub fn harmonic_count(&self) -> usize {
        self.cosine.len() - 1
    }

    /// Cosine coefficients indexed by harmonic, slot 0 reserved.
    pub fn cosine(&self) -> &[f64] {
        &self.cosine
    }

    /// Sine coefficients indexed by harmonic, slot 0 reserved.
    pub fn sine(&self) -> &[f64] {
        &self.sine
    }

    /// Phasor `a - jb` of harmonic `k`, so `a cos θ + b sin θ = |z| cos(θ + arg z)`.
    pub fn phasor(&self, k: usize) -> Complex64 {
        Complex64::new(self.a(k), -self.b(k))
    }

    /// Amplitude `√(a² + b²)` of harmonic `k`.
    pub fn magnitude(&self, k: usize) -> f64 {
        self.phasor(k).norm()
    }

    /// Mean-square contribution `(a² + b²)/2` of harmonic `k`.
    pub fn harmonic_power(&self, k: usize) -> f64 {
        self.phasor(k).norm_sqr() / 2.0
    }

    /// Mean-square contribution of the DC term, `a0²/4`.
    pub fn dc_power(&self) -> f64 {
        self.a0 * self.a0 / 4.0
    }

    /// Parseval power of the truncated series.
    pub fn total_power(&self) -> f64 {
        self.dc_power()
            + (1..=self.harmonic_count())
                .map(|k| self.harmonic_power(k))
                .sum::<f64>()
    }
}

/// Compute coefficients with default quadrature and no budget.
pub fn compute_coefficients<F>(
    function: &F,
    period: f64,
    harmonic_count: usize,
) -> Result<FourierCoefficients>
where
    F: PeriodicFunction + ?Sized,
{
    compute_coefficients_with(function, period, harmonic_count, &CoefficientOptions::default())
}

/// Compute the first `harmonic_count` harmonics of `function` over one period.
///
/// The function is sampled once on the quadrature grid and every harmonic
/// reuses those samples. Evaluation errors propagate unchanged.
pub fn compute_coefficients_with<F>(
    function: &F,
    period: f64,
    harmonic_count: usize,
    options: &CoefficientOptions,
) -> Result<FourierCoefficients>
where
    F: PeriodicFunction + ?Sized,
{
    validate_period(period)?;
    validate_harmonic_count(harmonic_count)?;
    let panels = options.quadrature.panels_for(harmonic_count)?;

    let nodes = quadrature::nodes(period, panels);
    let samples = function.evaluate(&nodes)?;
    if samples.len() != nodes.len() {
        return Err(Error::InvalidParameter(format!(
            "{} returned {} samples for {} nodes",
            function.describe(),
            samples.len(),
            nodes.len()
        )));
    }
    if let Some(i) = samples.iter().position(|v| !v.is_finite()) {
        return Err(fourier_signal::Error::Evaluation {
            expression: function.describe(),
            time: nodes[i],
            message: format!("non-finite value {}", samples[i]),
        }
        .into());
    }

    log::debug!(
        "integrating {} harmonics of {} over T = {} with {} panels",
        harmonic_count,
        function.describe(),
        period,
        panels
    );

    let weighted: Vec<f64> = samples
        .iter()
        .enumerate()
        .map(|(i, &f)| f * quadrature::weight(i, panels))
        .collect();

    let a0 = quadrature::projection(weighted.iter().copied(), panels);
    let mut a = Vec::with_capacity(harmonic_count);
    let mut b = Vec::with_capacity(harmonic_count);

    for k in 1..=harmonic_count {
        if let Some(budget) = &options.budget {
            budget.check(k - 1, harmonic_count)?;
        }
        let (ak, bk) = project_harmonic(&weighted, k, panels);
        a.push(ak);
        b.push(bk);
    }

    FourierCoefficients::new(a0, &a, &b)
}

/// Cosine and sine projections of harmonic `k`.
fn project_harmonic(weighted: &[f64], k: usize, panels: usize) -> (f64, f64) {
    let mut cos_sum = 0.0;
    let mut sin_sum = 0.0;
    for (i, &wf) in weighted.iter().enumerate() {
        // Reduce k·i modulo M so the angle stays in [0, 2π)
        let theta = TAU * ((k * i) % panels) as f64 / panels as f64;
        let (s, c) = theta.sin_cos();
        cos_sum += wf * c;
        sin_sum += wf * s;
    }
    let scale = 2.0 / panels as f64;
    (cos_sum * scale, sin_sum * scale)
}

pub(crate) fn validate_period(period: f64) -> Result<()> {
    if period.is_finite() && period > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "period must be positive and finite, got {}",
            period
        )))
    }
}

pub(crate) fn validate_harmonic_count(harmonic_count: usize) -> Result<()> {
    if (1..=MAX_HARMONICS).contains(&harmonic_count) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "harmonic count must be between 1 and {}, got {}",
            MAX_HARMONICS, harmonic_count
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use fourier_signal::{FnSignal, Signal, WaveformKind};

    use super::*;

    #[test]
    fn test_constant_signal() {
        let f = FnSignal::new(|_t: f64| 3.0);
        let c = compute_coefficients(&f, 2.0, 4).unwrap();
        assert!((c.a0() - 6.0).abs() < 1e-12);
        assert!((c.dc_level() - 3.0).abs() < 1e-12);
        for k in 1..=4 {
            assert!(c.a(k).abs() < 1e-12, "a[{}] = {}", k, c.a(k));
            assert!(c.b(k).abs() < 1e-12, "b[{}] = {}", k, c.b(k));
        }
    }

    #[test]
    fn test_pure_cosine_and_sine() {
        let f = FnSignal::new(|t: f64| 2.0 * (2.0 * PI * t).cos() + 0.5 * (6.0 * PI * t).sin());
        let c = compute_coefficients(&f, 1.0, 5).unwrap();
        assert!((c.a(1) - 2.0).abs() < 1e-9);
        assert!((c.b(3) - 0.5).abs() < 1e-9);
        assert!(c.a(2).abs() < 1e-9);
        assert!(c.b(1).abs() < 1e-9);
    }

    #[test]
    fn test_square_wave_coefficients() {
        let square = Signal::square(2.0 * PI, 1.0).unwrap();
        let c = compute_coefficients(&square, 2.0 * PI, 9).unwrap();
        assert!(c.a0().abs() < 1e-2);
        for k in (1..=9).step_by(2) {
            let expected = 4.0 / (PI * k as f64);
            assert!(
                (c.b(k) - expected).abs() < 1e-2,
                "b[{}] = {}, expected {}",
                k,
                c.b(k),
                expected
            );
        }
        for k in (2..=8).step_by(2) {
            assert!(c.b(k).abs() < 1e-2, "b[{}] = {}", k, c.b(k));
        }
    }

    #[test]
    fn test_reserved_index_and_out_of_range() {
        let c = FourierCoefficients::new(1.0, &[0.5, 0.25], &[0.1, 0.2]).unwrap();
        assert_eq!(c.harmonic_count(), 2);
        assert_eq!(c.cosine(), &[0.0, 0.5, 0.25]);
        assert_eq!(c.sine(), &[0.0, 0.1, 0.2]);
        assert_eq!(c.a(0), 0.0);
        assert_eq!(c.b(3), 0.0);
    }

    #[test]
    fn test_phasor_and_power() {
        let c = FourierCoefficients::new(2.0, &[3.0], &[4.0]).unwrap();
        assert!((c.magnitude(1) - 5.0).abs() < 1e-12);
        assert!((c.harmonic_power(1) - 12.5).abs() < 1e-12);
        assert!((c.dc_power() - 1.0).abs() < 1e-12);
        assert!((c.total_power() - 13.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        let f = FnSignal::new(|t: f64| t);
        assert!(matches!(
            compute_coefficients(&f, 0.0, 5),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            compute_coefficients(&f, f64::NAN, 5),
            Err(Error::InvalidParameter(_))
        ));
        assert!(compute_coefficients(&f, 1.0, 0).is_err());
        assert!(compute_coefficients(&f, 1.0, MAX_HARMONICS + 1).is_err());
        assert!(compute_coefficients(&f, 1.0, MAX_HARMONICS).is_ok());
        assert!(FourierCoefficients::new(0.0, &[1.0], &[]).is_err());
        assert!(FourierCoefficients::new(f64::NAN, &[1.0], &[1.0]).is_err());
    }

    #[test]
    fn test_evaluation_error_propagates() {
        let f = FnSignal::new(|t: f64| if t > 0.5 { f64::NAN } else { t });
        let err = compute_coefficients(&f, 1.0, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::Signal(fourier_signal::Error::Evaluation { .. })
        ));
    }

    #[test]
    fn test_budget_aborts_without_partial_result() {
        let signal = Signal::new(
            WaveformKind::Triangle,
            1.0,
            1.0,
            &Default::default(),
        )
        .unwrap();
        let options =
            CoefficientOptions::default().with_budget(ComputationBudget::unlimited().with_max_harmonics(4));
        match compute_coefficients_with(&signal, 1.0, 10, &options).unwrap_err() {
            Error::ComputationAborted {
                completed,
                requested,
                ..
            } => {
                assert_eq!(completed, 4);
                assert_eq!(requested, 10);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(compute_coefficients_with(&signal, 1.0, 4, &options).is_ok());
    }

    #[test]
    fn test_deterministic() {
        let signal = Signal::new(WaveformKind::Sawtooth, 1.5, 2.0, &Default::default()).unwrap();
        let first = compute_coefficients(&signal, 1.5, 12).unwrap();
        let second = compute_coefficients(&signal, 1.5, 12).unwrap();
        assert_eq!(first, second);
    }
}
