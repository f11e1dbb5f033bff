//! Curated internal API (UNSTABLE).
//!
//! A convenience surface for the CLI, the Python bindings and benches.
//! Breaking changes are allowed.

// Errors
pub use crate::error::{
    EquationError, MAXIMUM_POWER_EXCEEDED, MORE_THAN_ONE_VARIABLE, UNRECOGNIZED_EXPRESSION,
};
// Layout
pub use crate::layout::{
    assemble, assemble_with, should_add_bracket, BBox, Detection, GeometryCfg, GlyphMetrics,
    ReferenceGlyphs,
};
// Normalization and rendering
pub use crate::latex::{DefaultLatex, LatexRenderer};
pub use crate::normalize::{needs_product, normalize};
// Solver
pub use crate::solver::{
    infix_to_postfix, parse_and_solve_and_round, parse_to_polynomial, solve, Polynomial, Roots,
    SolverCfg,
};
// Pipeline
pub use crate::pipeline::{
    normalize_before_solve, process, process_default, process_expression, RootEntry, SolveOutput,
    INFINITE_ROOTS, NO_ROOTS,
};
