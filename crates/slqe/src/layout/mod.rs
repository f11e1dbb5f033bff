//! Layout: detections to a raw infix expression.
//!
//! Purpose
//! - Turn a bag of labelled boxes into one flat infix string (`x^2+(1/2)x=3`).
//! - Resolve the two 2D constructs handwriting uses: stacked fractions and
//!   raised exponents, including nested ones and small exponents.
//!
//! Why this design
//! - Each assembler level works on a sorted leaf slice; fractions and exponents
//!   become `Node` variants whose `members` are index ranges into that slice, so
//!   resolving never aliases or mutates shared structures.
//! - Recursion (fraction sides, scripts) is explicit and depth-capped through
//!   `GeometryCfg::max_depth`.
//! - Font metrics are a capability (`GlyphMetrics`), so tests can inject their own.
//!
//! Code cross-refs: `assemble`, `assemble_with`, `should_add_bracket`, `GeometryCfg`

mod assemble;
mod exponent;
mod fraction;
pub mod glyph;
pub mod position;
mod types;

pub use assemble::{assemble, assemble_with, should_add_bracket};
pub use glyph::{GlyphMetrics, ReferenceGlyphs};
pub use types::{BBox, Composite, Detection, Element, GeometryCfg, Node};
