//! Amplitude/phase form of the coefficients.

use serde::Serialize;

use crate::coefficients::FourierCoefficients;
use crate::error::Result;
use crate::mask::HarmonicMask;

/// One harmonic in `M cos(2πkt/T + φ)` form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralLine {
    /// Harmonic number (1 = fundamental).
    pub harmonic: usize,
    /// `√(a² + b²)`.
    pub magnitude: f64,
    /// `atan2(−b, a)` in degrees.
    pub phase_degrees: f64,
}

/// Spectral lines of the enabled harmonics, ascending.
pub fn spectrum(coefficients: &FourierCoefficients, mask: &HarmonicMask) -> Result<Vec<SpectralLine>> {
    mask.check_matches(coefficients)?;
    Ok(mask
        .enabled()
        .map(|k| {
            let z = coefficients.phasor(k);
            SpectralLine {
                harmonic: k,
                magnitude: z.norm(),
                phase_degrees: z.arg().to_degrees(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn test_magnitude_and_phase() {
        let c = FourierCoefficients::new(0.0, &[1.0, 0.0, 3.0], &[0.0, 2.0, 4.0]).unwrap();
        let lines = spectrum(&c, &HarmonicMask::all(3)).unwrap();
        assert_eq!(lines.len(), 3);

        assert_eq!(lines[0].harmonic, 1);
        assert!((lines[0].magnitude - 1.0).abs() < 1e-12);
        assert!(lines[0].phase_degrees.abs() < 1e-12);

        // Pure sine: sin θ = cos(θ - 90°)
        assert!((lines[1].magnitude - 2.0).abs() < 1e-12);
        assert!((lines[1].phase_degrees + 90.0).abs() < 1e-12);

        assert!((lines[2].magnitude - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase_reproduces_term() {
        let (a, b) = (0.7, -1.3);
        let c = FourierCoefficients::new(0.0, &[a], &[b]).unwrap();
        let line = spectrum(&c, &HarmonicMask::all(1)).unwrap()[0];
        let phi = line.phase_degrees.to_radians();
        for i in 0..16 {
            let theta = 2.0 * PI * i as f64 / 16.0;
            let direct = a * theta.cos() + b * theta.sin();
            let polar = line.magnitude * (theta + phi).cos();
            assert!((direct - polar).abs() < 1e-12);
        }
    }

    #[test]
    fn test_disabled_harmonics_omitted() {
        let c = FourierCoefficients::new(0.0, &[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0]).unwrap();
        let mask = HarmonicMask::from_flags(vec![true, false, true]);
        let harmonics: Vec<usize> = spectrum(&c, &mask)
            .unwrap()
            .iter()
            .map(|l| l.harmonic)
            .collect();
        assert_eq!(harmonics, vec![1, 3]);
        assert!(spectrum(&c, &HarmonicMask::all(4)).is_err());
    }
}
