//! Expression AST types.

use super::functions::Function;

/// Expression AST node.
///
/// The grammar is closed: there is no node that could name anything outside
/// the free time variable, numeric constants and the whitelisted [`Function`]s.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    /// Numeric constant (named constants such as `pi` are folded in at parse time).
    Constant(f64),
    /// The free variable, written `t` or `time`.
    Time,
    /// Binary operation.
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation.
    UnaryOp { op: UnaryOp, operand: Box<Expr> },
    /// Call of a whitelisted function.
    Function { func: Function, args: Vec<Expr> },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnaryOp {
    Neg,
}
