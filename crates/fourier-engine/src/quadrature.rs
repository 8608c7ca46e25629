//! Composite trapezoidal quadrature over one period.
//!
//! The period `[0, T]` is split into `M` equal panels, giving `M + 1` nodes
//! `t_i = iT/M` with both endpoints evaluated. For smooth periodic integrands
//! the trapezoid rule converges spectrally; across a jump it is `O(1/M)`.

use serde::Serialize;

use crate::error::{Error, Result};

/// Resolution of the coefficient integrals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuadratureConfig {
    /// Panels per period before any raise for high harmonics.
    pub samples_per_period: usize,
    /// Minimum panels per cycle of the highest harmonic.
    pub min_points_per_cycle: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            samples_per_period: 2000,
            min_points_per_cycle: 10,
        }
    }
}

impl QuadratureConfig {
    /// Config with a fixed panel count and the default per-cycle floor.
    pub fn with_samples(samples_per_period: usize) -> Self {
        Self {
            samples_per_period,
            ..Self::default()
        }
    }

    /// Panel count `M` used for `harmonic_count` harmonics.
    pub fn panels_for(&self, harmonic_count: usize) -> Result<usize> {
        if self.samples_per_period == 0 {
            return Err(Error::InvalidParameter(
                "samples_per_period must be at least 1".to_string(),
            ));
        }
        let floor = self.min_points_per_cycle.saturating_mul(harmonic_count);
        if floor > self.samples_per_period {
            log::debug!(
                "raising quadrature panels from {} to {} for {} harmonics",
                self.samples_per_period,
                floor,
                harmonic_count
            );
            Ok(floor)
        } else {
            Ok(self.samples_per_period)
        }
    }
}

/// The `panels + 1` quadrature nodes on `[0, period]`.
pub fn nodes(period: f64, panels: usize) -> Vec<f64> {
    let mut t: Vec<f64> = (0..=panels)
        .map(|i| period * i as f64 / panels as f64)
        .collect();
    t[panels] = period;
    t
}

/// Trapezoid weight of node `i` out of `panels + 1`, in units of the panel width.
#[inline]
pub(crate) fn weight(i: usize, panels: usize) -> f64 {
    if i == 0 || i == panels { 0.5 } else { 1.0 }
}

/// `(2/T)∫ f(t)·g_i dt` for samples already multiplied by the basis `g`.
///
/// The factor `2/T` times the panel width `T/M` collapses to `2/M`.
pub(crate) fn projection<I>(weighted_terms: I, panels: usize) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let sum: f64 = weighted_terms.into_iter().sum();
    2.0 * sum / panels as f64
}
