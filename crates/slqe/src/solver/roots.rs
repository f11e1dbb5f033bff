//! Real roots by derivative bracketing and bisection.
//!
//! Algorithm
//! - Degree 0: no roots, or infinitely many for the zero polynomial.
//! - Degree 1: closed form `-b/a`.
//! - Degree ≥ 2: solve the derivative recursively; its roots split the line
//!   into monotone intervals. Each interval holds at most one root; unbounded
//!   ends are bracketed by doubling steps outward, then bisection runs until
//!   `|f(mid)| <= epsilon`.
//! - Roots are rounded to `round(-log10(epsilon)) - 1` digits when rounding
//!   does not increase `|f|`.
//!
//! Two roots inside one monotone interval cannot occur, but a root where the
//! polynomial only touches zero between two critical points is reported only
//! if it lands within `epsilon` of an interval end.

use serde::{Deserialize, Serialize};

use super::poly::{parse_to_polynomial, Polynomial};
use crate::error::EquationError;

/// Solver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverCfg {
    /// Bisection stops once `|f(x)| <= epsilon`.
    pub epsilon: f64,
    /// Largest polynomial degree accepted by `^` and `solve`.
    pub max_degree: u32,
    /// Doubling steps allowed when bracketing an unbounded interval.
    pub max_bracket_steps: u32,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            max_degree: 256,
            max_bracket_steps: 1024,
        }
    }
}

impl SolverCfg {
    /// Decimal places kept when rounding roots.
    pub fn digits(&self) -> i32 {
        (-self.epsilon.log10()).round() as i32 - 1
    }

    /// `epsilon` must lie in `(0, 1)`; anything else has no rounding precision.
    pub fn validate(&self) -> Result<(), EquationError> {
        if self.epsilon > 0.0 && self.epsilon < 1.0 {
            Ok(())
        } else {
            Err(EquationError::evaluation(format!(
                "Epsilon must lie in (0, 1), got {}",
                self.epsilon
            )))
        }
    }
}

/// Solution set of `p(x) = 0`.
#[derive(Clone, Debug, PartialEq)]
pub enum Roots {
    Finite(Vec<f64>),
    /// The polynomial is identically zero.
    Infinite,
}

fn not_converged() -> EquationError {
    EquationError::evaluation("Root search did not converge")
}

fn round_to(v: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (v * scale).round() / scale
}

fn try_round(p: &Polynomial, raw: f64, digits: i32) -> f64 {
    let rounded = round_to(raw, digits);
    if p.eval(rounded).abs() <= p.eval(raw).abs() {
        rounded
    } else {
        raw
    }
}

/// Finite `lower < upper` with a sign change of `p` on `[lower, upper]`, if `p(-∞)` allows one.
pub fn lower_bound(p: &Polynomial, upper: f64, cfg: &SolverCfg) -> Result<Option<f64>, EquationError> {
    let fu = p.eval(upper);
    if p.eval(f64::NEG_INFINITY) * fu > 0.0 || fu == 0.0 {
        return Ok(None);
    }
    let mut step = 1.0;
    let mut lower = upper - step;
    let mut steps = 0;
    while p.eval(lower) * fu > 0.0 {
        steps += 1;
        if steps > cfg.max_bracket_steps || !lower.is_finite() {
            return Err(not_converged());
        }
        step *= 2.0;
        lower -= step;
    }
    Ok(Some(lower))
}

/// Mirror of [`lower_bound`] towards `+∞`.
pub fn upper_bound(p: &Polynomial, lower: f64, cfg: &SolverCfg) -> Result<Option<f64>, EquationError> {
    let fl = p.eval(lower);
    if p.eval(f64::INFINITY) * fl > 0.0 {
        return Ok(None);
    }
    let mut step = 1.0;
    let mut upper = lower + step;
    let mut steps = 0;
    while fl * p.eval(upper) > 0.0 {
        steps += 1;
        if steps > cfg.max_bracket_steps || !upper.is_finite() {
            return Err(not_converged());
        }
        step *= 2.0;
        upper += step;
    }
    Ok(Some(upper))
}

/// The root of `p` in `[lower, upper)`, or in `[lower, upper]` with `include_upper`.
///
/// `upper` is excluded by default because it is the `lower` of the next interval.
pub fn find_root(
    p: &Polynomial,
    lower: f64,
    upper: f64,
    include_upper: bool,
    cfg: &SolverCfg,
) -> Option<f64> {
    let eps = cfg.epsilon;
    let (mut lo, mut hi) = (lower, upper);
    if p.eval(lo).abs() <= eps {
        return Some(lo);
    }
    if p.eval(hi).abs() <= eps {
        return include_upper.then(|| try_round(p, hi, cfg.digits()));
    }
    if p.eval(lo) * p.eval(hi) > 0.0 {
        return None;
    }
    let mut mid = (lo + hi) / 2.0;
    while p.eval(mid).abs() > eps {
        if p.eval(mid) * p.eval(hi) > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        let next = (lo + hi) / 2.0;
        // Float resolution exhausted: `mid` is as close as it gets.
        if next == lo || next == hi {
            mid = next;
            break;
        }
        mid = next;
    }
    Some(try_round(p, mid, cfg.digits()))
}

/// Roots of `p` given the sorted roots of its derivative.
///
/// Every fence (critical point, or `0` when there are none) within `epsilon`
/// of zero is reported exactly once: by the interval starting at it, or
/// directly when no bracket exists to its right.
pub fn solve_from_critical_points(
    p: &Polynomial,
    critical: &[f64],
    cfg: &SolverCfg,
) -> Result<Vec<f64>, EquationError> {
    let mut roots = Vec::new();
    let (first, last) = match (critical.first(), critical.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => (0.0, 0.0),
    };
    if let Some(lo) = lower_bound(p, first, cfg)? {
        roots.extend(find_root(p, lo, first, false, cfg));
    }
    for w in critical.windows(2) {
        roots.extend(find_root(p, w[0], w[1], false, cfg));
    }
    match upper_bound(p, last, cfg)? {
        Some(hi) => roots.extend(find_root(p, last, hi, true, cfg)),
        // Nothing to the right claims the last fence, so it is claimed here.
        None if p.eval(last).abs() <= cfg.epsilon && roots.last() != Some(&last) => {
            roots.push(last)
        }
        None => {}
    }
    Ok(roots)
}

/// Real roots of `p`, ascending.
pub fn solve(p: &Polynomial, cfg: &SolverCfg) -> Result<Roots, EquationError> {
    let degree = p.degree();
    if degree > cfg.max_degree {
        return Err(EquationError::DepthExceeded {
            depth: degree as usize,
            limit: cfg.max_degree as usize,
        });
    }
    match degree {
        0 if p.is_zero() => Ok(Roots::Infinite),
        0 => Ok(Roots::Finite(Vec::new())),
        1 => Ok(Roots::Finite(vec![-p.coefficient(0) / p.coefficient(1)])),
        _ => {
            let critical = match solve(&p.derivative(), cfg)? {
                Roots::Finite(c) => c,
                Roots::Infinite => Vec::new(),
            };
            let roots = solve_from_critical_points(p, &critical, cfg)?;
            tracing::trace!(degree, critical = critical.len(), roots = roots.len(), "solved");
            Ok(Roots::Finite(roots))
        }
    }
}

/// Parse an equation over `x`, solve it and round the roots.
///
/// Accepts `expr` (solved as `expr = 0`), `expr=0`, and `lhs=rhs`.
pub fn parse_and_solve_and_round(expr: &str, cfg: &SolverCfg) -> Result<Roots, EquationError> {
    cfg.validate()?;
    let parse = |s: &str| parse_to_polynomial(s, cfg.max_degree);
    let poly = match expr.split_once('=') {
        None => parse(expr)?,
        Some((lhs, "0")) => parse(lhs)?,
        Some((lhs, rhs)) => parse(lhs)?.minus(&parse(rhs)?),
    };
    tracing::debug!(polynomial = %poly, degree = poly.degree(), "parsed");
    Ok(match solve(&poly, cfg)? {
        Roots::Infinite => Roots::Infinite,
        // `+ 0.0` folds -0.0 into 0.0.
        Roots::Finite(r) => Roots::Finite(r.into_iter().map(|x| round_to(x, cfg.digits()) + 0.0).collect()),
    })
}
