//! Handwritten polynomial equations: detections in, real roots out.
//!
//! Pipeline: `layout` (boxes → infix) → `normalize` → `solver` (postfix →
//! polynomial → roots), with `latex` on the side and `pipeline::process` tying
//! it together. Every stage is pure and synchronous; recursion is depth-capped
//! through `GeometryCfg::max_depth` and `SolverCfg::max_degree`.
//!
//! API Policy
//! - There is no stable public API. `api` and `prelude` are the intended
//!   import surfaces for the CLI and the Python bindings.

pub mod api;
pub mod error;
pub mod latex;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod solver;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::EquationError;
pub use pipeline::{process, process_default, SolveOutput};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::EquationError;
    pub use crate::latex::{DefaultLatex, LatexRenderer};
    pub use crate::layout::{assemble, Detection, GeometryCfg, GlyphMetrics, ReferenceGlyphs};
    pub use crate::pipeline::{process, process_default, process_expression, RootEntry, SolveOutput};
    pub use crate::solver::{parse_and_solve_and_round, Roots, SolverCfg};
}
