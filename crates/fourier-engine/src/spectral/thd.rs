//! Total Harmonic Distortion (THD) and harmonic content report.
//!
//! THD measures the harmonic content relative to the fundamental,
//! expressed as a percentage:
//!
//! THD = sqrt(M2² + M3² + ... + Mn²) / M1 × 100%
//!
//! where M1 is the fundamental magnitude and M2..Mn are the magnitudes of
//! the enabled higher harmonics.

use serde::Serialize;

use crate::coefficients::FourierCoefficients;
use crate::error::Result;
use crate::mask::HarmonicMask;

/// Magnitudes at or below this are treated as absent.
const MAGNITUDE_FLOOR: f64 = 1e-20;

/// Number of entries in [`HarmonicAnalysis::dominant`].
const DOMINANT_COUNT: usize = 5;

/// Information about a single harmonic.
#[derive(Debug, Clone, Serialize)]
pub struct HarmonicInfo {
    /// Harmonic number (1 = fundamental, 2 = second harmonic, etc.)
    pub harmonic_number: usize,
    /// Magnitude (linear).
    pub magnitude: f64,
    /// Magnitude in dB.
    pub magnitude_db: f64,
    /// Phase in degrees, `atan2(-b, a)`.
    pub phase_degrees: f64,
    /// Mean-square contribution `(a² + b²)/2`.
    pub power: f64,
    /// Share of the summed harmonic power (percentage, DC excluded).
    pub power_percent: f64,
    /// Magnitude relative to fundamental (percentage).
    pub relative_percent: f64,
}

/// Harmonic content of a coefficient set.
#[derive(Debug, Clone, Serialize)]
pub struct HarmonicAnalysis {
    /// One entry per enabled harmonic, ascending.
    pub harmonics: Vec<HarmonicInfo>,
    /// Summed power of the enabled harmonics (DC excluded).
    pub harmonic_power: f64,
    /// Power of the fundamental, zero when it is masked off.
    pub fundamental_power: f64,
    /// Fundamental magnitude.
    pub fundamental_magnitude: f64,
    /// Up to five harmonic numbers with the largest magnitude, largest first.
    pub dominant: Vec<usize>,
    /// THD as a percentage.
    pub thd_percent: f64,
    /// THD in dB (20*log10(THD/100)).
    pub thd_db: f64,
}

/// THD in percent over the enabled harmonics `k ≥ 2`.
///
/// The fundamental is always the reference, masked or not. Returns 0 when
/// its magnitude is at or below `1e-20`.
pub fn total_harmonic_distortion(coefficients: &FourierCoefficients, mask: &HarmonicMask) -> Result<f64> {
    mask.check_matches(coefficients)?;
    let fundamental = coefficients.magnitude(1);
    if fundamental <= MAGNITUDE_FLOOR {
        return Ok(0.0);
    }
    let harmonic_sum_sq: f64 = mask
        .enabled()
        .filter(|&k| k >= 2)
        .map(|k| coefficients.phasor(k).norm_sqr())
        .sum();
    Ok(harmonic_sum_sq.sqrt() / fundamental * 100.0)
}

/// Per-harmonic power breakdown, dominant harmonics and THD.
pub fn harmonic_analysis(coefficients: &FourierCoefficients, mask: &HarmonicMask) -> Result<HarmonicAnalysis> {
    let thd_percent = total_harmonic_distortion(coefficients, mask)?;
    let fundamental_magnitude = coefficients.magnitude(1);

    let harmonic_power: f64 = mask.enabled().map(|k| coefficients.harmonic_power(k)).sum();

    let harmonics: Vec<HarmonicInfo> = mask
        .enabled()
        .map(|k| {
            let z = coefficients.phasor(k);
            let magnitude = z.norm();
            let power = coefficients.harmonic_power(k);
            HarmonicInfo {
                harmonic_number: k,
                magnitude,
                magnitude_db: if magnitude > MAGNITUDE_FLOOR {
                    20.0 * magnitude.log10()
                } else {
                    -400.0
                },
                phase_degrees: z.arg().to_degrees(),
                power,
                power_percent: if harmonic_power > 0.0 {
                    power / harmonic_power * 100.0
                } else {
                    0.0
                },
                relative_percent: if fundamental_magnitude > MAGNITUDE_FLOOR {
                    magnitude / fundamental_magnitude * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    let mut ranked: Vec<&HarmonicInfo> = harmonics.iter().collect();
    // Stable sort keeps the lower harmonic first among equal magnitudes
    ranked.sort_by(|x, y| y.magnitude.total_cmp(&x.magnitude));
    let dominant = ranked
        .iter()
        .take(DOMINANT_COUNT)
        .map(|h| h.harmonic_number)
        .collect();

    let fundamental_power = if mask.is_enabled(1) {
        coefficients.harmonic_power(1)
    } else {
        0.0
    };

    let thd_db = if thd_percent > MAGNITUDE_FLOOR {
        20.0 * (thd_percent / 100.0).log10()
    } else {
        f64::NEG_INFINITY
    };

    Ok(HarmonicAnalysis {
        harmonics,
        harmonic_power,
        fundamental_power,
        fundamental_magnitude,
        dominant,
        thd_percent,
        thd_db,
    })
}
