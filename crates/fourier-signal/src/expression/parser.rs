//! Expression parsing using recursive descent.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/') unary)*
//! unary          := ('-' | '+') unary | power
//! power          := primary (('^' | '**') unary)?
//! primary        := number | identifier | identifier '(' args ')' | '(' additive ')'
//! ```
//!
//! Unary minus binds looser than `^`, so `-t^2` is `-(t^2)`.
//!
//! Nesting and operator chains share a depth limit, which also bounds the
//! recursion of evaluating and dropping the resulting tree.

use std::f64::consts::{E, PI, TAU};

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::functions::Function;

/// Deepest tree the parser will build.
pub const MAX_DEPTH: usize = 256;

/// Parse a mathematical expression in the free variable `t`.
pub fn parse_expression(input: &str) -> Result<Expr, String> {
    let mut parser = ExprParser::new(input);
    parser.parse()
}

/// Expression parser using recursive descent.
struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(&mut self) -> Result<Expr, String> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return Err("empty expression".to_string());
        }
        let expr = self.parse_additive()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            Err(format!(
                "unexpected '{}' at position {}",
                self.current_char().unwrap_or('?'),
                self.pos
            ))
        } else {
            Ok(expr)
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            let c = self.input.as_bytes()[self.pos] as char;
            if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.as_bytes().get(self.pos).map(|&b| b as char)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input
            .as_bytes()
            .get(self.pos + offset)
            .map(|&b| b as char)
    }

    /// The full (possibly multi-byte) character at the cursor, for messages.
    fn current_char(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|s| s.chars().next())
    }

    fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    fn check_str(&self, s: &str) -> bool {
        self.input.as_bytes()[self.pos..].starts_with(s.as_bytes())
    }

    /// One level deeper; the caller undoes it with `self.depth -= n`.
    fn descend(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(format!(
                "expression nested too deeply (limit {} levels) at position {}",
                MAX_DEPTH, self.pos
            ));
        }
        Ok(())
    }

    fn parse_additive(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_multiplicative()?;
        let mut chained = 0;

        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('+') => BinaryOp::Add,
                Some('-') => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.descend()?;
            chained += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth -= chained;
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_unary()?;
        let mut chained = 0;

        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('*') if !self.check_str("**") => BinaryOp::Mul,
                Some('/') => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            self.descend()?;
            chained += 1;
            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth -= chained;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        self.descend()?;
        let expr = self.parse_signed();
        self.depth -= 1;
        expr
    }

    fn parse_signed(&mut self) -> Result<Expr, String> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                })
            }
            Some('+') => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_primary()?;

        self.skip_whitespace();
        if self.peek() == Some('^') || self.check_str("**") {
            if self.peek() == Some('*') {
                self.advance(); // consume first *
            }
            self.advance(); // consume ^ or second *
            let exp = self.parse_unary()?; // Right associative
            Ok(Expr::BinaryOp {
                op: BinaryOp::Pow,
                left: Box::new(base),
                right: Box::new(exp),
            })
        } else {
            Ok(base)
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        self.skip_whitespace();

        match self.peek() {
            Some('(') => {
                self.advance();
                let expr = self.parse_additive()?;
                self.skip_whitespace();
                if self.peek() != Some(')') {
                    return Err(format!("expected ')' at position {}", self.pos));
                }
                self.advance();
                Ok(expr)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_identifier(),
            Some(_) => Err(format!(
                "unexpected '{}' at position {}",
                self.current_char().unwrap_or('?'),
                self.pos
            )),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn parse_number(&mut self) -> Result<Expr, String> {
        let start = self.pos;
        let mut has_dot = false;
        let mut has_exp = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !has_dot && !has_exp {
                has_dot = true;
                self.advance();
            } else if (c == 'e' || c == 'E') && !has_exp && self.exponent_follows() {
                has_exp = true;
                self.advance();
                if self.peek() == Some('+') || self.peek() == Some('-') {
                    self.advance();
                }
            } else {
                break;
            }
        }

        let num_str = &self.input[start..self.pos];
        let value: f64 = num_str
            .parse()
            .map_err(|_| format!("invalid number '{}'", num_str))?;
        Ok(Expr::Constant(value))
    }

    /// Whether the `e` at the cursor starts an exponent (`1e3`, `1e-3`)
    /// rather than a following identifier.
    fn exponent_follows(&self) -> bool {
        match self.peek_at(1) {
            Some(c) if c.is_ascii_digit() => true,
            Some('+') | Some('-') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn parse_identifier(&mut self) -> Result<Expr, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let ident = &self.input[start..self.pos];
        let ident_lower = ident.to_ascii_lowercase();

        // numpy-style namespace prefix: np.sin(...), np.pi
        if ident_lower == "np" && self.peek() == Some('.') {
            self.advance();
            return match self.peek() {
                Some(c) if c.is_ascii_alphabetic() => self.parse_identifier(),
                _ => Err(format!("expected a name after 'np.' at position {}", self.pos)),
            };
        }

        self.skip_whitespace();

        if self.peek() == Some('(') {
            let func = Function::from_name(&ident_lower)
                .ok_or_else(|| format!("unknown function '{}'", ident))?;
            self.advance();
            let args = self.parse_function_args()?;
            func.check_arity(args.len())?;
            return Ok(Expr::Function { func, args });
        }

        match ident_lower.as_str() {
            "pi" => Ok(Expr::Constant(PI)),
            "e" => Ok(Expr::Constant(E)),
            "tau" => Ok(Expr::Constant(TAU)),
            "t" | "time" => Ok(Expr::Time),
            _ => Err(format!(
                "unknown identifier '{}' (the time variable is 't')",
                ident
            )),
        }
    }

    fn parse_function_args(&mut self) -> Result<Vec<Expr>, String> {
        let mut args = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.advance();
            return Ok(args);
        }

        loop {
            let arg = self.parse_additive()?;
            args.push(arg);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(')') => {
                    self.advance();
                    break;
                }
                _ => {
                    return Err(format!(
                        "expected ',' or ')' in function arguments at position {}",
                        self.pos
                    ));
                }
            }
        }

        Ok(args)
    }
}
