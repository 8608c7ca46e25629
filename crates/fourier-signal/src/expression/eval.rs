//! Expression evaluation and analysis.

use super::ast::{BinaryOp, Expr, UnaryOp};

impl Expr {
    /// Evaluate the expression at time `t`.
    ///
    /// Domain errors (division by zero, logarithm of a non-positive value,
    /// and so on) are returned as messages; nothing is clamped or replaced.
    pub fn eval(&self, t: f64) -> Result<f64, String> {
        match self {
            Expr::Constant(v) => Ok(*v),
            Expr::Time => Ok(t),
            Expr::BinaryOp { op, left, right } => {
                let l = left.eval(t)?;
                let r = right.eval(t)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div => {
                        if r == 0.0 {
                            Err("division by zero".to_string())
                        } else {
                            Ok(l / r)
                        }
                    }
                    BinaryOp::Pow => {
                        let v = l.powf(r);
                        if v.is_nan() {
                            Err(format!("{}^{} is undefined", l, r))
                        } else {
                            Ok(v)
                        }
                    }
                }
            }
            Expr::UnaryOp { op, operand } => {
                let v = operand.eval(t)?;
                match op {
                    UnaryOp::Neg => Ok(-v),
                }
            }
            Expr::Function { func, args } => {
                let arg_values = args
                    .iter()
                    .map(|a| a.eval(t))
                    .collect::<Result<Vec<f64>, String>>()?;
                func.eval(&arg_values)
            }
        }
    }

    /// Check if this expression depends on time.
    pub fn is_time_dependent(&self) -> bool {
        match self {
            Expr::Constant(_) => false,
            Expr::Time => true,
            Expr::BinaryOp { left, right, .. } => {
                left.is_time_dependent() || right.is_time_dependent()
            }
            Expr::UnaryOp { operand, .. } => operand.is_time_dependent(),
            Expr::Function { args, .. } => args.iter().any(|a| a.is_time_dependent()),
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Constant(_) | Expr::Time => 1,
            Expr::BinaryOp { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Expr::UnaryOp { operand, .. } => 1 + operand.node_count(),
            Expr::Function { args, .. } => 1 + args.iter().map(Expr::node_count).sum::<usize>(),
        }
    }
}
