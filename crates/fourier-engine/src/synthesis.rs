//! Reconstruction of a signal from its coefficients.
//!
//! Both the selective and the progressive paths start from `a0/2` and add
//! harmonic terms in ascending `k` through [`harmonic_term`], so frame `n` of
//! a progressive build-up is bit-identical to a selective synthesis with
//! the first `n` harmonics enabled.

use std::f64::consts::TAU;
use std::iter::FusedIterator;

use fourier_signal::validate_time_grid;
use serde::Serialize;

use crate::coefficients::{FourierCoefficients, validate_period};
use crate::error::Result;
use crate::mask::HarmonicMask;

/// Reconstructed samples on a caller-supplied time grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconstructedSignal {
    pub time: Vec<f64>,
    pub values: Vec<f64>,
}

impl ReconstructedSignal {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(time, amplitude)` pairs in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.values.iter().copied())
    }
}

/// `a cos(2πkt/T) + b sin(2πkt/T)`.
#[inline]
pub(crate) fn harmonic_term(a: f64, b: f64, k: usize, t: f64, period: f64) -> f64 {
    let theta = TAU * k as f64 * t / period;
    let (s, c) = theta.sin_cos();
    a * c + b * s
}

pub(crate) fn add_harmonic(
    values: &mut [f64],
    time: &[f64],
    coefficients: &FourierCoefficients,
    k: usize,
    period: f64,
) {
    let (a, b) = (coefficients.a(k), coefficients.b(k));
    for (v, &t) in values.iter_mut().zip(time) {
        *v += harmonic_term(a, b, k, t, period);
    }
}

pub(crate) fn validate_inputs(time_grid: &[f64], period: f64) -> Result<()> {
    validate_period(period)?;
    validate_time_grid(time_grid)?;
    Ok(())
}

/// Evaluate `a0/2 + Σ mask[k]·(a[k] cos + b[k] sin)` on `time_grid`.
pub fn synthesize(
    coefficients: &FourierCoefficients,
    mask: &HarmonicMask,
    time_grid: &[f64],
    period: f64,
) -> Result<ReconstructedSignal> {
    validate_inputs(time_grid, period)?;
    mask.check_matches(coefficients)?;

    let mut values = vec![coefficients.dc_level(); time_grid.len()];
    for k in mask.enabled() {
        add_harmonic(&mut values, time_grid, coefficients, k, period);
    }
    Ok(ReconstructedSignal {
        time: time_grid.to_vec(),
        values,
    })
}

/// All `N + 1` frames of the progressive build-up.
///
/// `frames[0]` is the DC-only frame and `frames[n]` holds the first `n`
/// harmonics.
pub fn synthesize_progressive(
    coefficients: &FourierCoefficients,
    time_grid: &[f64],
    period: f64,
) -> Result<Vec<ReconstructedSignal>> {
    Ok(ProgressiveSynthesis::new(coefficients, time_grid, period)?.collect())
}

/// Lazy progressive build-up, one frame per harmonic.
///
/// The iterator is finite and can be restarted with [`restart`](Self::restart)
/// or by cloning it before iteration.
#[derive(Debug, Clone)]
pub struct ProgressiveSynthesis<'a> {
    coefficients: &'a FourierCoefficients,
    time: Vec<f64>,
    period: f64,
    partial: Vec<f64>,
    next_frame: usize,
}

impl<'a> ProgressiveSynthesis<'a> {
    pub fn new(coefficients: &'a FourierCoefficients, time_grid: &[f64], period: f64) -> Result<Self> {
        validate_inputs(time_grid, period)?;
        Ok(Self {
            coefficients,
            time: time_grid.to_vec(),
            period,
            partial: vec![coefficients.dc_level(); time_grid.len()],
            next_frame: 0,
        })
    }

    /// Rewind to the DC-only frame.
    pub fn restart(&mut self) {
        self.partial.fill(self.coefficients.dc_level());
        self.next_frame = 0;
    }

    /// Number of harmonics in the frame that `next` will return.
    pub fn next_harmonic_count(&self) -> usize {
        self.next_frame
    }

    fn frame_count(&self) -> usize {
        self.coefficients.harmonic_count() + 1
    }
}

impl Iterator for ProgressiveSynthesis<'_> {
    type Item = ReconstructedSignal;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_frame >= self.frame_count() {
            return None;
        }
        if self.next_frame > 0 {
            add_harmonic(
                &mut self.partial,
                &self.time,
                self.coefficients,
                self.next_frame,
                self.period,
            );
        }
        self.next_frame += 1;
        Some(ReconstructedSignal {
            time: self.time.clone(),
            values: self.partial.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.frame_count().saturating_sub(self.next_frame);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgressiveSynthesis<'_> {}

impl FusedIterator for ProgressiveSynthesis<'_> {}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use fourier_signal::linspace;

    use super::*;
    use crate::error::Error;

    fn sample_coefficients() -> FourierCoefficients {
        FourierCoefficients::new(1.0, &[0.5, 0.0, 0.25], &[0.0, 1.0, -0.5]).unwrap()
    }

    #[test]
    fn test_full_mask_matches_formula() {
        let c = sample_coefficients();
        let grid = linspace(0.0, 2.0, 41, true).unwrap();
        let out = synthesize(&c, &HarmonicMask::all(3), &grid, 2.0).unwrap();
        assert_eq!(out.len(), grid.len());
        for (t, v) in out.iter() {
            let w = PI * t;
            let expected = 0.5 + 0.5 * w.cos() + (2.0 * w).sin() + 0.25 * (3.0 * w).cos()
                - 0.5 * (3.0 * w).sin();
            assert!((v - expected).abs() < 1e-12, "t = {}: {} vs {}", t, v, expected);
        }
    }

    #[test]
    fn test_empty_mask_is_dc() {
        let c = sample_coefficients();
        let grid = linspace(0.0, 1.0, 11, true).unwrap();
        let out = synthesize(&c, &HarmonicMask::none(3), &grid, 1.0).unwrap();
        assert!(out.values.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_mask_length_mismatch() {
        let c = sample_coefficients();
        let err = synthesize(&c, &HarmonicMask::all(2), &[0.0], 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_bad_grid_rejected() {
        let c = sample_coefficients();
        assert!(synthesize(&c, &HarmonicMask::all(3), &[1.0, 0.0], 1.0).is_err());
        assert!(synthesize(&c, &HarmonicMask::all(3), &[0.0], -1.0).is_err());
    }

    #[test]
    fn test_progressive_frames_match_prefix_masks() {
        let c = sample_coefficients();
        let grid = linspace(-1.0, 1.0, 33, true).unwrap();
        let frames = synthesize_progressive(&c, &grid, 1.0).unwrap();
        assert_eq!(frames.len(), 4);
        for (n, frame) in frames.iter().enumerate() {
            let selective = synthesize(&c, &HarmonicMask::prefix(n, 3), &grid, 1.0).unwrap();
            assert_eq!(frame, &selective, "frame {}", n);
        }
    }

    #[test]
    fn test_iterator_restart_and_clone() {
        let c = sample_coefficients();
        let grid = [0.0, 0.1, 0.2];
        let mut frames = ProgressiveSynthesis::new(&c, &grid, 1.0).unwrap();
        let pristine = frames.clone();
        assert_eq!(frames.len(), 4);

        let first_pass: Vec<_> = frames.by_ref().collect();
        assert!(frames.next().is_none());

        frames.restart();
        assert_eq!(frames.next_harmonic_count(), 0);
        let second_pass: Vec<_> = frames.collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!(pristine.collect::<Vec<_>>(), first_pass);
    }
}
