//! Limits on a coefficient computation.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Optional caps checked before each harmonic is integrated.
///
/// Exceeding either cap aborts the whole computation with
/// [`Error::ComputationAborted`]; no partial coefficients are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputationBudget {
    /// Maximum number of harmonics that may be integrated.
    pub max_harmonics: Option<usize>,
    /// Wall-clock instant after which no further harmonic is started.
    pub deadline: Option<Instant>,
}

impl ComputationBudget {
    /// No limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_harmonics(mut self, max_harmonics: usize) -> Self {
        self.max_harmonics = Some(max_harmonics);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Check whether harmonic `completed + 1` may start.
    pub fn check(&self, completed: usize, requested: usize) -> Result<()> {
        if let Some(max) = self.max_harmonics {
            if completed >= max {
                return Err(Error::ComputationAborted {
                    completed,
                    requested,
                    reason: format!("harmonic limit of {} reached", max),
                });
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Error::ComputationAborted {
                    completed,
                    requested,
                    reason: "deadline exceeded".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_aborts() {
        let budget = ComputationBudget::unlimited();
        assert!(budget.check(0, 50).is_ok());
        assert!(budget.check(49, 50).is_ok());
    }

    #[test]
    fn test_harmonic_limit() {
        let budget = ComputationBudget::unlimited().with_max_harmonics(3);
        assert!(budget.check(2, 10).is_ok());
        match budget.check(3, 10).unwrap_err() {
            Error::ComputationAborted {
                completed,
                requested,
                ..
            } => {
                assert_eq!(completed, 3);
                assert_eq!(requested, 10);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_past_deadline() {
        let budget = ComputationBudget::unlimited().with_deadline(Instant::now());
        let err = budget.check(0, 5).unwrap_err();
        assert!(err.to_string().contains("deadline"));
    }
}
