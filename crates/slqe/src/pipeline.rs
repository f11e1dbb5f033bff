//! End-to-end processing: detections → expression → roots.
//!
//! Purpose
//! - One entry point (`process`) that never fails: every `EquationError`
//!   becomes an invalid `SolveOutput` carrying the user-facing message.
//!
//! Stages
//! 1. `assemble_with` (layout) → raw infix.
//! 2. `normalize` → canonical infix; this is the reported `expression`.
//! 3. LaTeX; a renderer failure only logs a warning.
//! 4. `normalize_before_solve` → single variable rewritten to `x`.
//! 5. `parse_and_solve_and_round` → roots, packaged with sentinels.
//!
//! Code cross-refs: `process`, `process_expression`, `SolveOutput`

use serde::Serialize;

use crate::error::{EquationError, MORE_THAN_ONE_VARIABLE};
use crate::latex::{DefaultLatex, LatexRenderer};
use crate::layout::{assemble_with, Detection, GeometryCfg, GlyphMetrics, ReferenceGlyphs};
use crate::normalize::normalize;
use crate::solver::{parse_and_solve_and_round, Roots, SolverCfg};

/// Root list entry reported when the polynomial has no real root.
pub const NO_ROOTS: &str = "No roots";
/// Root list entry reported when the polynomial is identically zero.
pub const INFINITE_ROOTS: &str = "Infinite roots";

/// One entry of the reported root list: a number or a sentinel string.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RootEntry {
    Number(f64),
    Text(String),
}

/// Result record handed to the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SolveOutput {
    pub valid: bool,
    /// Empty on success.
    pub message: String,
    /// Normalized infix expression, reported even when solving fails.
    pub expression: String,
    pub latex: String,
    pub roots: Vec<RootEntry>,
    /// The letter that was solved for, if any.
    pub variable: Option<char>,
}

impl SolveOutput {
    fn fail(mut self, err: &EquationError) -> Self {
        tracing::debug!(error = %err, expression = %self.expression, "solve failed");
        self.valid = false;
        self.message = err.user_message();
        self.roots.clear();
        self
    }
}

/// Rewrite the single variable to `x`.
///
/// The first letter is the variable; a second distinct letter is rejected.
/// Returns the rewritten expression and the variable (`None` for constants).
pub fn normalize_before_solve(expr: &str) -> Result<(String, Option<char>), EquationError> {
    let mut letters = expr.chars().filter(|c| c.is_alphabetic());
    let Some(variable) = letters.next() else {
        return Ok((expr.to_string(), None));
    };
    if letters.any(|c| c != variable) {
        return Err(EquationError::evaluation(MORE_THAN_ONE_VARIABLE));
    }
    let rewritten = expr
        .chars()
        .map(|c| if c == variable { 'x' } else { c })
        .collect();
    Ok((rewritten, Some(variable)))
}

fn package(roots: Roots) -> Vec<RootEntry> {
    match roots {
        Roots::Infinite => vec![RootEntry::Text(INFINITE_ROOTS.to_string())],
        Roots::Finite(r) if r.is_empty() => vec![RootEntry::Text(NO_ROOTS.to_string())],
        Roots::Finite(r) => r.into_iter().map(RootEntry::Number).collect(),
    }
}

/// Run the full pipeline on detector output.
pub fn process(
    detections: &[Detection],
    geometry: &GeometryCfg,
    solver: &SolverCfg,
    glyphs: &dyn GlyphMetrics,
    latex: &dyn LatexRenderer,
) -> SolveOutput {
    match assemble_with(detections, geometry, glyphs) {
        Ok(raw) => process_expression(&raw, solver, latex),
        Err(err) => SolveOutput::default().fail(&err),
    }
}

/// [`process`] with default configuration, reference glyphs and [`DefaultLatex`].
pub fn process_default(detections: &[Detection]) -> SolveOutput {
    process(
        detections,
        &GeometryCfg::default(),
        &SolverCfg::default(),
        &ReferenceGlyphs,
        &DefaultLatex,
    )
}

/// Stages 2 to 5 on an already assembled (or typed) infix string.
pub fn process_expression(raw: &str, solver: &SolverCfg, latex: &dyn LatexRenderer) -> SolveOutput {
    let mut out = SolveOutput {
        expression: normalize(raw),
        ..SolveOutput::default()
    };
    match latex.render(&out.expression) {
        Ok(tex) => out.latex = tex,
        Err(err) => tracing::warn!(error = %err, expression = %out.expression, "latex rendering failed"),
    }
    let solved = normalize_before_solve(&out.expression).and_then(|(expr, variable)| {
        out.variable = variable;
        parse_and_solve_and_round(&expr, solver)
    });
    match solved {
        Ok(roots) => {
            out.valid = true;
            out.roots = package(roots);
            tracing::debug!(expression = %out.expression, roots = ?out.roots, "solved");
            out
        }
        Err(err) => out.fail(&err),
    }
}
