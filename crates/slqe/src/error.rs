//! Error taxonomy shared by the layout, parser, evaluator and solver.
//!
//! Three kinds, all recoverable:
//! - `Syntax`: bracket mismatch, unknown token, operator/operand starvation.
//! - `Evaluation`: the expression parses but is not a solvable single-variable
//!   polynomial (non-constant divisor, bad exponent, several variables, ...).
//! - `DepthExceeded`: an explicit recursion/degree guard tripped.
//!
//! `process` turns every variant into the `{valid: false, message}` record via
//! [`EquationError::user_message`].

use std::fmt;

/// Message surfaced for any syntax failure.
pub const UNRECOGNIZED_EXPRESSION: &str = "Unrecognized expression";
/// Message surfaced when a recursion or degree guard trips.
pub const MAXIMUM_POWER_EXCEEDED: &str = "Maximum power exceeded";
/// Message surfaced when more than one distinct letter appears.
pub const MORE_THAN_ONE_VARIABLE: &str = "More than one variable is not supported";

/// Errors surfaced by the detection-to-roots pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum EquationError {
    Syntax(String),
    Evaluation(String),
    /// A guard tripped: `depth` reached while `limit` was the cap.
    DepthExceeded { depth: usize, limit: usize },
}

impl EquationError {
    pub(crate) fn syntax(reason: impl Into<String>) -> Self {
        Self::Syntax(reason.into())
    }

    pub(crate) fn evaluation(reason: impl Into<String>) -> Self {
        Self::Evaluation(reason.into())
    }

    /// Message placed in the output record for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Syntax(_) => UNRECOGNIZED_EXPRESSION.to_string(),
            Self::Evaluation(reason) => reason.clone(),
            Self::DepthExceeded { .. } => MAXIMUM_POWER_EXCEEDED.to_string(),
        }
    }
}

impl fmt::Display for EquationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(reason) => write!(f, "syntax error: {reason}"),
            Self::Evaluation(reason) => write!(f, "evaluation error: {reason}"),
            Self::DepthExceeded { depth, limit } => {
                write!(f, "expression too complex (depth {depth} exceeds limit {limit})")
            }
        }
    }
}

impl std::error::Error for EquationError {}
