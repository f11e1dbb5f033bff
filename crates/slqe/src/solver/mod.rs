//! Equation solving over a single variable `x`.
//!
//! Purpose
//! - Parse a normalized infix string into a sparse `Polynomial` and return its
//!   real roots, rounded to the precision implied by `SolverCfg::epsilon`.
//!
//! Why this design
//! - Polynomials stay closed under the accepted grammar: division and powers
//!   only take constants, so no rational functions appear.
//! - Degree is capped (`SolverCfg::max_degree`), which also bounds the
//!   derivative recursion depth in `solve`.
//!
//! Code cross-refs: `tokenize`, `to_postfix`, `evaluate_postfix`, `solve`,
//! `parse_and_solve_and_round`

mod poly;
mod roots;
mod tokens;

pub use poly::{evaluate_postfix, parse_to_polynomial, Polynomial};
pub use roots::{
    find_root, lower_bound, parse_and_solve_and_round, solve, solve_from_critical_points,
    upper_bound, Roots, SolverCfg,
};
pub use tokens::{infix_to_postfix, to_postfix, tokenize, Op, Token};

#[cfg(test)]
mod tests;
