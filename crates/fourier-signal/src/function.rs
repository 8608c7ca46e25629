//! The evaluator contract consumed by the coefficient engine.

use crate::error::{Error, Result};
use crate::expression::Expression;
use crate::waveforms::WaveformKind;

/// Structural fingerprint of a function, used as a memoization key.
///
/// Two functions with equal keys must produce identical samples. Floating
/// point parameters are stored by bit pattern so the key is `Eq + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionKey {
    /// Built-in waveform family with its parameters.
    Waveform {
        kind: WaveformKind,
        period_bits: u64,
        amplitude_bits: u64,
        duty_bits: Option<u64>,
    },
    /// Custom expression, keyed by its literal text.
    Expression { text: String, amplitude_bits: u64 },
    /// Caller-chosen label for an arbitrary closure.
    Labeled(String),
}

/// A real function of time, implicitly periodic, evaluated over sample vectors.
///
/// Implementations must either return one finite value per input time or
/// fail; a NaN standing in for an evaluation failure is not allowed.
pub trait PeriodicFunction {
    /// Evaluate at every time in `times`.
    fn evaluate(&self, times: &[f64]) -> Result<Vec<f64>>;

    /// Structural identity for caching. `None` disables caching.
    fn cache_key(&self) -> Option<FunctionKey> {
        None
    }

    /// Short description for log messages.
    fn describe(&self) -> String {
        "function".to_string()
    }
}

impl<T: PeriodicFunction + ?Sized> PeriodicFunction for &T {
    fn evaluate(&self, times: &[f64]) -> Result<Vec<f64>> {
        (**self).evaluate(times)
    }

    fn cache_key(&self) -> Option<FunctionKey> {
        (**self).cache_key()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl PeriodicFunction for Expression {
    fn evaluate(&self, times: &[f64]) -> Result<Vec<f64>> {
        self.eval_many(times)
    }

    fn cache_key(&self) -> Option<FunctionKey> {
        Some(FunctionKey::Expression {
            text: self.source().to_string(),
            amplitude_bits: 1.0f64.to_bits(),
        })
    }

    fn describe(&self) -> String {
        format!("expression '{}'", self)
    }
}

/// Adapter turning a plain closure into a [`PeriodicFunction`].
///
/// Non-finite return values are reported as [`Error::Evaluation`].
pub struct FnSignal<F> {
    func: F,
    label: Option<String>,
}

impl<F: Fn(f64) -> f64> FnSignal<F> {
    /// Wrap a closure. Unlabeled closures are never cached.
    pub fn new(func: F) -> Self {
        Self { func, label: None }
    }

    /// Wrap a closure under a label that identifies it for caching.
    ///
    /// The caller guarantees that equal labels mean equal functions.
    pub fn labeled(label: impl Into<String>, func: F) -> Self {
        Self {
            func,
            label: Some(label.into()),
        }
    }
}

impl<F: Fn(f64) -> f64> PeriodicFunction for FnSignal<F> {
    fn evaluate(&self, times: &[f64]) -> Result<Vec<f64>> {
        times
            .iter()
            .map(|&t| {
                let v = (self.func)(t);
                if v.is_finite() {
                    Ok(v)
                } else {
                    Err(Error::Evaluation {
                        expression: self.describe(),
                        time: t,
                        message: format!("non-finite value {}", v),
                    })
                }
            })
            .collect()
    }

    fn cache_key(&self) -> Option<FunctionKey> {
        self.label.clone().map(FunctionKey::Labeled)
    }

    fn describe(&self) -> String {
        self.label.clone().unwrap_or_else(|| "<closure>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_evaluation() {
        let f = FnSignal::new(|t: f64| 2.0 * t);
        assert_eq!(f.evaluate(&[0.0, 1.0, 2.5]).unwrap(), vec![0.0, 2.0, 5.0]);
        assert_eq!(f.cache_key(), None);
    }

    #[test]
    fn test_closure_nan_is_an_error() {
        let f = FnSignal::labeled("log", |t: f64| t.ln());
        let err = f.evaluate(&[1.0, -1.0]).unwrap_err();
        match err {
            Error::Evaluation {
                expression, time, ..
            } => {
                assert_eq!(expression, "log");
                assert_eq!(time, -1.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_labeled_closure_has_key() {
        let f = FnSignal::labeled("ramp", |t: f64| t);
        assert_eq!(f.cache_key(), Some(FunctionKey::Labeled("ramp".to_string())));
    }

    #[test]
    fn test_reference_forwarding() {
        let expr = Expression::parse("t + 1").unwrap();
        let by_ref: &dyn PeriodicFunction = &expr;
        assert_eq!(by_ref.evaluate(&[1.0]).unwrap(), vec![2.0]);
        assert_eq!(by_ref.cache_key(), expr.cache_key());
    }
}
