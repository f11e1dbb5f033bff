//! Sparse single-variable polynomials and postfix evaluation.
//!
//! A `Polynomial` maps degree → coefficient. Every arithmetic result is
//! simplified: coefficients that are exactly zero are dropped, so the zero
//! polynomial is the empty map. Division and exponentiation only accept
//! constant right-hand sides, which keeps every result a polynomial.

use std::collections::BTreeMap;
use std::fmt;

use super::tokens::{infix_to_postfix, Op, Token};
use crate::error::EquationError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polynomial {
    terms: BTreeMap<u32, f64>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(c: f64) -> Self {
        Self::from_terms([(0, c)])
    }

    /// The polynomial `x`.
    pub fn variable() -> Self {
        Self::from_terms([(1, 1.0)])
    }

    /// Build from `(degree, coefficient)` pairs; repeated degrees add up.
    pub fn from_terms(terms: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let mut map = BTreeMap::new();
        for (d, c) in terms {
            *map.entry(d).or_insert(0.0) += c;
        }
        Self { terms: map }.simplify()
    }

    fn simplify(mut self) -> Self {
        self.terms.retain(|_, c| *c != 0.0);
        self
    }

    /// Non-zero terms in ascending degree.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (u32, f64)> + '_ {
        self.terms.iter().map(|(d, c)| (*d, *c))
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Highest degree with a non-zero coefficient; `0` for the zero polynomial.
    #[inline]
    pub fn degree(&self) -> u32 {
        self.terms.keys().next_back().copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.degree() == 0
    }

    #[inline]
    pub fn coefficient(&self, degree: u32) -> f64 {
        self.terms.get(&degree).copied().unwrap_or(0.0)
    }

    /// Dense coefficients from the highest degree down to the constant.
    pub fn full_coefficients(&self) -> Vec<f64> {
        (0..=self.degree()).rev().map(|d| self.coefficient(d)).collect()
    }

    pub fn plus(&self, other: &Polynomial) -> Polynomial {
        Self::from_terms(self.terms().chain(other.terms()))
    }

    pub fn minus(&self, other: &Polynomial) -> Polynomial {
        self.plus(&other.neg())
    }

    pub fn neg(&self) -> Polynomial {
        Self {
            terms: self.terms.iter().map(|(d, c)| (*d, -c)).collect(),
        }
    }

    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        Self::from_terms(
            self.terms()
                .flat_map(|(d1, c1)| other.terms().map(move |(d2, c2)| (d1 + d2, c1 * c2))),
        )
    }

    /// Divide by a constant polynomial.
    pub fn divide(&self, divisor: &Polynomial) -> Result<Polynomial, EquationError> {
        if !divisor.is_constant() {
            return Err(EquationError::evaluation("Denominator must be a number"));
        }
        let d = divisor.coefficient(0);
        if d == 0.0 {
            return Err(EquationError::evaluation("Divided by zero"));
        }
        Ok(Self::from_terms(self.terms().map(|(deg, c)| (deg, c / d))))
    }

    /// Raise to a constant non-negative integer power.
    ///
    /// Fails with `DepthExceeded` when the result degree would pass `max_degree`.
    pub fn power(&self, exponent: &Polynomial, max_degree: u32) -> Result<Polynomial, EquationError> {
        if !exponent.is_constant() {
            return Err(EquationError::evaluation("Power must be a number"));
        }
        let p = exponent.coefficient(0);
        if p.fract() != 0.0 || !p.is_finite() {
            return Err(EquationError::evaluation(format!(
                "Not integer power is not supported: {p}"
            )));
        }
        if p < 0.0 {
            return Err(EquationError::evaluation(format!(
                "Negative power is not supported: {p}"
            )));
        }
        if self.is_constant() {
            return Ok(Self::constant(self.coefficient(0).powf(p)));
        }
        let result_degree = f64::from(self.degree()) * p;
        if result_degree > f64::from(max_degree) {
            return Err(EquationError::DepthExceeded {
                depth: result_degree as usize,
                limit: max_degree as usize,
            });
        }
        // Square-and-multiply; `p` is bounded by `max_degree` here.
        let mut n = p as u32;
        let mut base = self.clone();
        let mut acc = Self::constant(1.0);
        while n > 0 {
            if n & 1 == 1 {
                acc = acc.multiply(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.multiply(&base);
            }
        }
        Ok(acc)
    }

    pub fn derivative(&self) -> Polynomial {
        Self::from_terms(
            self.terms()
                .filter(|(d, _)| *d >= 1)
                .map(|(d, c)| (d - 1, c * f64::from(d))),
        )
    }

    /// Value at `x`; at `±∞` the sign follows the leading term.
    pub fn eval(&self, x: f64) -> f64 {
        if x.is_infinite() {
            let Some((d, c)) = self.terms().next_back() else {
                return 0.0;
            };
            let sign = if x < 0.0 && d % 2 == 1 { -c.signum() } else { c.signum() };
            return sign * f64::INFINITY;
        }
        self.terms().map(|(d, c)| c * x.powf(f64::from(d))).sum()
    }
}

impl fmt::Display for Polynomial {
    /// Descending terms, e.g. `3x^2 - x + 0.5`; the zero polynomial prints `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        for (i, (d, c)) in self.terms().rev().enumerate() {
            let magnitude = if i == 0 {
                if c < 0.0 {
                    f.write_str("-")?;
                }
                c.abs()
            } else {
                f.write_str(if c < 0.0 { " - " } else { " + " })?;
                c.abs()
            };
            let show_coeff = d == 0 || magnitude != 1.0;
            if show_coeff {
                write!(f, "{magnitude}")?;
            }
            match d {
                0 => {}
                1 => f.write_str("x")?,
                _ => write!(f, "x^{d}")?,
            }
        }
        Ok(())
    }
}

fn operand(token: &Token) -> Result<Polynomial, EquationError> {
    match token {
        Token::Symbol('x') => Ok(Polynomial::variable()),
        Token::Number(s) => s
            .parse::<f64>()
            .map(Polynomial::constant)
            .map_err(|_| EquationError::syntax(format!("Token is not supported: {s}"))),
        other => Err(EquationError::syntax(format!("Token is not supported: {other}"))),
    }
}

/// Evaluate a postfix stream over the variable `x`.
pub fn evaluate_postfix(tokens: &[Token], max_degree: u32) -> Result<Polynomial, EquationError> {
    let invalid = || EquationError::syntax("Invalid expression");
    let mut stack: Vec<Polynomial> = Vec::new();
    for token in tokens {
        let op = match token {
            Token::Op(op) => *op,
            other => {
                stack.push(operand(other)?);
                continue;
            }
        };
        let result = if op.is_unary() {
            let a = stack.pop().ok_or_else(invalid)?;
            match op {
                Op::Neg => a.neg(),
                _ => a,
            }
        } else {
            let b = stack.pop().ok_or_else(invalid)?;
            let a = stack.pop().ok_or_else(invalid)?;
            match op {
                Op::Add => a.plus(&b),
                Op::Sub => a.minus(&b),
                Op::Mul => a.multiply(&b),
                Op::Div => a.divide(&b)?,
                _ => a.power(&b, max_degree)?,
            }
        };
        stack.push(result);
    }
    match (stack.pop(), stack.is_empty()) {
        (Some(p), true) => Ok(p),
        _ => Err(invalid()),
    }
}

/// Parse an infix expression over `x` into a polynomial.
pub fn parse_to_polynomial(expr: &str, max_degree: u32) -> Result<Polynomial, EquationError> {
    evaluate_postfix(&infix_to_postfix(expr)?, max_degree)
}
