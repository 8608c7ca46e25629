//! Whitelisted built-in functions.

use std::fmt;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exact(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "1 argument"),
            Arity::Exact(k) => write!(f, "{} arguments", k),
            Arity::AtLeast(k) => write!(f, "at least {} arguments", k),
        }
    }
}

/// A function that custom expressions may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Function {
    // Trigonometric
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,

    // Exponential/logarithmic
    Exp,
    Ln,
    Log10,
    Log2,
    Sqrt,
    Pow,

    // Piecewise
    Abs,
    Sign,
    Floor,
    Ceil,
    Round,
    Min,
    Max,
    Mod,
}

impl Function {
    /// Every whitelisted function, in documentation order.
    pub const ALL: &'static [Function] = &[
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Atan2,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Exp,
        Function::Ln,
        Function::Log10,
        Function::Log2,
        Function::Sqrt,
        Function::Pow,
        Function::Abs,
        Function::Sign,
        Function::Floor,
        Function::Ceil,
        Function::Round,
        Function::Min,
        Function::Max,
        Function::Mod,
    ];

    /// Look up a function by (case-insensitive) name.
    ///
    /// `log` is the natural logarithm, matching the numpy spelling users type.
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name.to_ascii_lowercase().as_str() {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" | "arcsin" => Function::Asin,
            "acos" | "arccos" => Function::Acos,
            "atan" | "arctan" => Function::Atan,
            "atan2" | "arctan2" => Function::Atan2,
            "sinh" => Function::Sinh,
            "cosh" => Function::Cosh,
            "tanh" => Function::Tanh,
            "exp" => Function::Exp,
            "ln" | "log" => Function::Ln,
            "log10" => Function::Log10,
            "log2" => Function::Log2,
            "sqrt" => Function::Sqrt,
            "pow" | "power" => Function::Pow,
            "abs" => Function::Abs,
            "sign" | "sgn" => Function::Sign,
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            "round" => Function::Round,
            "min" | "minimum" => Function::Min,
            "max" | "maximum" => Function::Max,
            "mod" | "fmod" => Function::Mod,
            _ => return None,
        };
        Some(func)
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Atan2 => "atan2",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log10 => "log10",
            Function::Log2 => "log2",
            Function::Sqrt => "sqrt",
            Function::Pow => "pow",
            Function::Abs => "abs",
            Function::Sign => "sign",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Round => "round",
            Function::Min => "min",
            Function::Max => "max",
            Function::Mod => "mod",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Function::Atan2 | Function::Pow | Function::Mod => Arity::Exact(2),
            Function::Min | Function::Max => Arity::AtLeast(1),
            _ => Arity::Exact(1),
        }
    }

    /// Check an argument count against this function's arity.
    pub fn check_arity(self, n: usize) -> Result<(), String> {
        if self.arity().accepts(n) {
            Ok(())
        } else {
            Err(format!(
                "{}() takes {}, got {}",
                self.name(),
                self.arity(),
                n
            ))
        }
    }

    /// Evaluate with already-evaluated arguments.
    ///
    /// Arity has been checked by the parser. Domain violations are reported
    /// as errors rather than clamped.
    pub fn eval(self, args: &[f64]) -> Result<f64, String> {
        let x = args.first().copied().unwrap_or(0.0);
        let y = args.get(1).copied().unwrap_or(0.0);
        let value = match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin | Function::Acos if !(-1.0..=1.0).contains(&x) => {
                return Err(format!("{}({}) is outside [-1, 1]", self.name(), x));
            }
            Function::Asin => x.asin(),
            Function::Acos => x.acos(),
            Function::Atan => x.atan(),
            Function::Atan2 => x.atan2(y),
            Function::Sinh => x.sinh(),
            Function::Cosh => x.cosh(),
            Function::Tanh => x.tanh(),
            Function::Exp => x.exp(),
            Function::Ln | Function::Log10 | Function::Log2 if x <= 0.0 => {
                return Err(format!("{}({}) of a non-positive value", self.name(), x));
            }
            Function::Ln => x.ln(),
            Function::Log10 => x.log10(),
            Function::Log2 => x.log2(),
            Function::Sqrt if x < 0.0 => {
                return Err(format!("sqrt({}) of a negative value", x));
            }
            Function::Sqrt => x.sqrt(),
            Function::Pow => x.powf(y),
            Function::Abs => x.abs(),
            Function::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Function::Floor => x.floor(),
            Function::Ceil => x.ceil(),
            Function::Round => x.round(),
            Function::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Function::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Function::Mod if y == 0.0 => {
                return Err(format!("mod({}, 0) divides by zero", x));
            }
            Function::Mod => x.rem_euclid(y),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{}() produced a non-finite value", self.name()))
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(Function::from_name("LOG"), Some(Function::Ln));
        assert_eq!(Function::from_name("arctan2"), Some(Function::Atan2));
        assert_eq!(Function::from_name("eval"), None);
        assert_eq!(Function::from_name("__import__"), None);
    }

    #[test]
    fn test_every_function_round_trips_by_name() {
        for &func in Function::ALL {
            assert_eq!(Function::from_name(func.name()), Some(func));
        }
    }

    #[test]
    fn test_arity() {
        assert!(Function::Sin.check_arity(1).is_ok());
        assert!(Function::Sin.check_arity(2).is_err());
        assert!(Function::Pow.check_arity(2).is_ok());
        assert!(Function::Max.check_arity(3).is_ok());
        assert!(Function::Max.check_arity(0).is_err());
    }

    #[test]
    fn test_domain_errors() {
        assert!(Function::Sqrt.eval(&[-1.0]).is_err());
        assert!(Function::Ln.eval(&[0.0]).is_err());
        assert!(Function::Asin.eval(&[1.5]).is_err());
        assert!(Function::Mod.eval(&[1.0, 0.0]).is_err());
        assert!(Function::Exp.eval(&[1e6]).is_err());
    }

    #[test]
    fn test_values() {
        assert_eq!(Function::Sign.eval(&[-3.0]).unwrap(), -1.0);
        assert_eq!(Function::Max.eval(&[1.0, 4.0, 2.0]).unwrap(), 4.0);
        assert_eq!(Function::Mod.eval(&[-0.25, 1.0]).unwrap(), 0.75);
        assert!((Function::Log10.eval(&[1000.0]).unwrap() - 3.0).abs() < 1e-12);
    }
}
