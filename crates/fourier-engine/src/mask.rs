//! Per-harmonic enable flags.

use serde::{Deserialize, Serialize};

use crate::coefficients::FourierCoefficients;
use crate::error::{Error, Result};

/// One flag per harmonic `1..=N`. Harmonics are addressed 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HarmonicMask {
    flags: Vec<bool>,
}

impl HarmonicMask {
    /// All `n` harmonics enabled.
    pub fn all(n: usize) -> Self {
        Self {
            flags: vec![true; n],
        }
    }

    /// All `n` harmonics disabled.
    pub fn none(n: usize) -> Self {
        Self {
            flags: vec![false; n],
        }
    }

    /// Harmonics `1..=enabled` on, the rest off. `enabled` is clamped to `n`.
    pub fn prefix(enabled: usize, n: usize) -> Self {
        Self {
            flags: (1..=n).map(|k| k <= enabled).collect(),
        }
    }

    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// Number of harmonics covered.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether harmonic `k` is on. Out-of-range harmonics are off.
    pub fn is_enabled(&self, k: usize) -> bool {
        k >= 1 && self.flags.get(k - 1).copied().unwrap_or(false)
    }

    pub fn enabled_count(&self) -> usize {
        self.flags.iter().filter(|&&on| on).count()
    }

    /// Enabled harmonic numbers in ascending order.
    pub fn enabled(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| i + 1)
    }

    pub fn as_flags(&self) -> &[bool] {
        &self.flags
    }

    pub fn set(&mut self, k: usize, on: bool) -> Result<()> {
        let slot = self.slot(k)?;
        *slot = on;
        Ok(())
    }

    pub fn enable(&mut self, k: usize) -> Result<()> {
        self.set(k, true)
    }

    pub fn disable(&mut self, k: usize) -> Result<()> {
        self.set(k, false)
    }

    /// Flip harmonic `k`, returning its new state.
    pub fn toggle(&mut self, k: usize) -> Result<bool> {
        let slot = self.slot(k)?;
        *slot = !*slot;
        Ok(*slot)
    }

    /// Fail unless the mask covers exactly the harmonics of `coefficients`.
    pub fn check_matches(&self, coefficients: &FourierCoefficients) -> Result<()> {
        if self.len() == coefficients.harmonic_count() {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "mask covers {} harmonics but coefficients have {}",
                self.len(),
                coefficients.harmonic_count()
            )))
        }
    }

    fn slot(&mut self, k: usize) -> Result<&mut bool> {
        let n = self.flags.len();
        match k.checked_sub(1).and_then(|i| self.flags.get_mut(i)) {
            Some(slot) => Ok(slot),
            None => Err(Error::InvalidParameter(format!(
                "harmonic {} is outside 1..={}",
                k, n
            ))),
        }
    }
}
