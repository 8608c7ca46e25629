//! Sandboxed parsing and evaluation of user-written functions of time.
//!
//! Supports expressions like:
//! - `sin(2*pi*t)` - elementary functions of the time variable
//! - `t^2 - 0.5` - arithmetic with `^` or `**` for powers
//! - `np.abs(np.sin(2*np.pi*t))` - numpy spellings, `np.` is ignored
//!
//! Text is parsed into a closed AST over a fixed whitelist of operators and
//! functions with a single free variable. Evaluation is a tree walk; nothing
//! in the input can reach code outside that whitelist.

mod ast;
mod eval;
mod functions;
mod parser;

use std::fmt;
use std::str::FromStr;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use functions::{Arity, Function};
pub use parser::{MAX_DEPTH, parse_expression};

use crate::error::{Error, Result};

/// A parsed custom function together with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// Parse `source`, reporting failures as [`Error::Expression`].
    pub fn parse(source: &str) -> Result<Self> {
        let root = parse_expression(source).map_err(|message| Error::Expression {
            expression: source.to_string(),
            message,
        })?;
        log::debug!(
            "parsed expression '{}' ({} nodes)",
            source,
            root.node_count()
        );
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The original text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed tree.
    pub fn ast(&self) -> &Expr {
        &self.root
    }

    /// Evaluate at a single time. Non-finite results are errors.
    pub fn eval(&self, t: f64) -> Result<f64> {
        match self.root.eval(t) {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(v) => Err(self.evaluation_error(t, format!("non-finite result {}", v))),
            Err(message) => Err(self.evaluation_error(t, message)),
        }
    }

    /// Evaluate over a slice of times, failing on the first bad sample.
    pub fn eval_many(&self, times: &[f64]) -> Result<Vec<f64>> {
        times.iter().map(|&t| self.eval(t)).collect()
    }

    fn evaluation_error(&self, time: f64, message: String) -> Error {
        Error::Evaluation {
            expression: self.source.clone(),
            time,
            message,
        }
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{E, PI};

    use super::*;

    fn eval_at(src: &str, t: f64) -> f64 {
        Expression::parse(src).unwrap().eval(t).unwrap()
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression("42").unwrap();
        assert_eq!(expr, Expr::Constant(42.0));
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(eval_at("1e3", 0.0), 1000.0);
        assert_eq!(eval_at("2.5E-1", 0.0), 0.25);
    }

    #[test]
    fn test_parse_addition() {
        assert_eq!(eval_at("1 + 2", 0.0), 3.0);
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(eval_at("2 + 3 * 4", 0.0), 14.0);
        assert_eq!(eval_at("(2 + 3) * 4", 0.0), 20.0);
        assert_eq!(eval_at("8 / 4 / 2", 0.0), 1.0);
    }

    #[test]
    fn test_parse_power() {
        assert_eq!(eval_at("2^3", 0.0), 8.0);
        assert_eq!(eval_at("2**3", 0.0), 8.0);
        // Right associative
        assert_eq!(eval_at("2^3^2", 0.0), 512.0);
        // Unary minus binds looser than power
        assert_eq!(eval_at("-2^2", 0.0), -4.0);
        assert_eq!(eval_at("2^-1", 0.0), 0.5);
    }

    #[test]
    fn test_parse_unary_minus() {
        assert_eq!(eval_at("-5", 0.0), -5.0);
        assert_eq!(eval_at("--5", 0.0), 5.0);
        assert_eq!(eval_at("+t", 3.0), 3.0);
    }

    #[test]
    fn test_time_variable() {
        assert_eq!(eval_at("t", 0.5), 0.5);
        assert_eq!(eval_at("time * 2", 0.5), 1.0);
        assert!(parse_expression("t").unwrap().is_time_dependent());
        assert!(!parse_expression("sin(pi)").unwrap().is_time_dependent());
    }

    #[test]
    fn test_named_constants() {
        assert_eq!(eval_at("pi", 0.0), PI);
        assert_eq!(eval_at("e", 0.0), E);
        assert!((eval_at("tau", 0.0) - 2.0 * PI).abs() < 1e-15);
    }

    #[test]
    fn test_functions() {
        assert!((eval_at("sin(2*pi*t)", 0.25) - 1.0).abs() < 1e-12);
        assert!((eval_at("exp(1)", 0.0) - E).abs() < 1e-12);
        assert_eq!(eval_at("max(1, t, 3)", 5.0), 5.0);
        assert_eq!(eval_at("abs(t)", -2.0), 2.0);
    }

    #[test]
    fn test_numpy_prefix() {
        let v = eval_at("np.sin(2*np.pi*t)", 0.25);
        assert!((v - 1.0).abs() < 1e-12);
        assert_eq!(eval_at("np.abs(-3)", 0.0), 3.0);
    }

    #[test]
    fn test_reject_unknown_identifier() {
        let err = Expression::parse("x + 1").unwrap_err();
        match err {
            Error::Expression { expression, message } => {
                assert_eq!(expression, "x + 1");
                assert!(message.contains("unknown identifier"), "{}", message);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_reject_unknown_function() {
        assert!(Expression::parse("__import__(1)").is_err());
        assert!(Expression::parse("eval(t)").is_err());
        assert!(Expression::parse("np.linalg(t)").is_err());
    }

    #[test]
    fn test_reject_wrong_arity() {
        let err = Expression::parse("sin(t, 2)").unwrap_err();
        assert!(err.to_string().contains("sin() takes 1 argument"));
        assert!(Expression::parse("atan2(t)").is_err());
    }

    #[test]
    fn test_reject_malformed() {
        for src in ["", "   ", "1 +", "(t", "t)", "2t", "sin(t", "1 $ 2", "t ** ", "sin t"] {
            assert!(Expression::parse(src).is_err(), "'{}' should not parse", src);
        }
    }

    #[test]
    fn test_reject_non_ascii_without_panicking() {
        let err = Expression::parse("t × 2").unwrap_err();
        assert!(err.to_string().contains('×'));
    }

    #[test]
    fn test_reject_deep_nesting() {
        let parens = format!("{}t{}", "(".repeat(100_000), ")".repeat(100_000));
        let negations = format!("{}t", "-".repeat(100_000));
        let powers = format!("t{}", "^t".repeat(100_000));
        let calls = format!("{}t{}", "sin(".repeat(100_000), ")".repeat(100_000));
        for src in [&parens, &negations, &powers, &calls] {
            match Expression::parse(src).unwrap_err() {
                Error::Expression {
                    expression,
                    message,
                } => {
                    assert_eq!(&expression, src);
                    assert!(message.contains("nested too deeply"), "{}", message);
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_long_operator_chain_is_bounded() {
        let sum = vec!["t"; 100_000].join(" + ");
        assert!(Expression::parse(&sum).is_err());

        let within = format!("{}t{}", "(".repeat(MAX_DEPTH / 4), ")".repeat(MAX_DEPTH / 4));
        assert_eq!(eval_at(&within, 2.0), 2.0);
        let short_sum = vec!["t"; 100].join(" + ");
        assert_eq!(eval_at(&short_sum, 1.0), 100.0);
    }

    #[test]
    fn test_division_by_zero_is_an_evaluation_error() {
        let expr = Expression::parse("1 / t").unwrap();
        assert!(expr.eval(1.0).is_ok());
        match expr.eval(0.0).unwrap_err() {
            Error::Evaluation {
                expression, time, ..
            } => {
                assert_eq!(expression, "1 / t");
                assert_eq!(time, 0.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_domain_errors() {
        assert!(Expression::parse("sqrt(t)").unwrap().eval(-1.0).is_err());
        assert!(Expression::parse("log(t)").unwrap().eval(0.0).is_err());
        assert!(Expression::parse("(-1)^0.5").unwrap().eval(0.0).is_err());
        assert!(Expression::parse("exp(t)").unwrap().eval(1e5).is_err());
    }

    #[test]
    fn test_eval_many_stops_at_first_failure() {
        let expr = Expression::parse("1 / (t - 0.5)").unwrap();
        let err = expr.eval_many(&[0.0, 0.25, 0.5, 0.75]).unwrap_err();
        assert!(matches!(err, Error::Evaluation { time, .. } if time == 0.5));
    }

    #[test]
    fn test_from_str_and_display() {
        let expr: Expression = "cos(t)".parse().unwrap();
        assert_eq!(expr.to_string(), "cos(t)");
        assert_eq!(expr.source(), "cos(t)");
    }
}
