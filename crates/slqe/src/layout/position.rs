//! Positional predicates and label classes shared by the resolvers.
//!
//! All vertical tests use layout boxes (`Node::bbox`), so a descender does not
//! drag a symbol's bottom edge below the baseline. The small-exponent size
//! ratio uses ink boxes because nominal glyph boxes include descenders.

use super::glyph::GlyphMetrics;
use super::types::{BBox, GeometryCfg, Node};

/// Thresholds plus the glyph metric source, threaded through one assembly.
#[derive(Clone, Copy)]
pub(crate) struct Ctx<'a> {
    pub cfg: &'a GeometryCfg,
    pub glyphs: &'a dyn GlyphMetrics,
}

// ---- label classes ---------------------------------------------------------

fn single_char(label: &str) -> Option<char> {
    let mut it = label.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

pub fn is_operator(label: &str) -> bool {
    matches!(label, "+" | "*" | "/" | "=" | "-" | "^" | ":")
}

pub fn is_decimal_separator(label: &str) -> bool {
    matches!(label, "," | ".")
}

pub fn is_opening_bracket(label: &str) -> bool {
    matches!(label, "(" | "[" | "{")
}

pub fn is_closing_bracket(label: &str) -> bool {
    matches!(label, ")" | "]" | "}")
}

/// Labels whose glyph reaches below the baseline.
pub fn has_descender(label: &str) -> bool {
    label == "y"
}

/// A script may start with a digit, a letter, a sign or an opening bracket.
/// Multi-character labels (composites) always qualify.
pub fn can_start_script(label: &str) -> bool {
    match single_char(label) {
        Some(c) => c.is_ascii_alphanumeric() || c == '+' || c == '-' || is_opening_bracket(label),
        None => !label.is_empty(),
    }
}

/// A base is a digit, a letter, a closing bracket or a composite.
pub fn can_carry_script(label: &str) -> bool {
    match single_char(label) {
        Some(c) => c.is_ascii_alphanumeric() || is_closing_bracket(label),
        None => !label.is_empty(),
    }
}

// ---- box predicates --------------------------------------------------------

/// `script` ends in the upper part of `base`.
#[inline]
pub fn is_superscript(base: &BBox, script: &BBox, cfg: &GeometryCfg) -> bool {
    script.bottom() <= base.top() + base.height() * cfg.superscript_threshold
}

/// `cur` starts in the lower part of `prev`.
#[inline]
pub fn is_subscript(prev: &BBox, cur: &BBox, cfg: &GeometryCfg) -> bool {
    cur.top() >= prev.top() + prev.height() * cfg.subscript_threshold
}

/// Slope from base center to script center is at least the configured angle.
/// A script left of or level with the base (negative or NaN slope) fails.
#[inline]
pub fn rises_steeply(base: &BBox, script: &BBox, cfg: &GeometryCfg) -> bool {
    let slope = (base.center.y - script.center.y) / (script.center.x - base.center.x);
    let min = cfg.exponent_angle_threshold_degrees.to_radians().tan();
    slope >= min
}

/// `op` sits on the line of `base` rather than in its script zone.
#[inline]
pub fn is_inline_operator(base: &BBox, op: &BBox, cfg: &GeometryCfg) -> bool {
    op.center.y >= base.top() + base.height() * cfg.inline_operator_threshold
}

// ---- node predicates -------------------------------------------------------

/// A script drawn clearly smaller than its base while still raised by a quarter.
///
/// Compares detected/nominal area ratios; unknown glyphs or composites fail.
pub(crate) fn is_small_exponent(base: &Node, script: &Node, ctx: &Ctx) -> bool {
    let (b, s) = (base.bbox(), script.bbox());
    if s.bottom() >= b.bottom() - b.height() * ctx.cfg.quarter_superscript_threshold {
        return false;
    }
    let nominal = |n: &Node| {
        single_char(n.expression())
            .and_then(|c| ctx.glyphs.nominal_box(c))
            .map(|(w, h)| w * h)
            .filter(|a| *a > 0.0)
    };
    let (Some(base_nominal), Some(script_nominal)) = (nominal(base), nominal(script)) else {
        return false;
    };
    let base_scale = base.ink().area() / base_nominal;
    let script_scale = script.ink().area() / script_nominal;
    base_scale > 0.0 && script_scale / base_scale < ctx.cfg.exponent_base_size_ratio_threshold
}

/// `cur` is in the script zone of `base`, by position or by size.
pub(crate) fn is_raised(base: &Node, cur: &Node, ctx: &Ctx) -> bool {
    is_superscript(&base.bbox(), &cur.bbox(), ctx.cfg) || is_small_exponent(base, cur, ctx)
}

/// `script` starts an exponent of `base`.
pub(crate) fn is_exponent(base: &Node, script: &Node, ctx: &Ctx) -> bool {
    if !can_carry_script(base.expression()) || !can_start_script(script.expression()) {
        return false;
    }
    let (b, s) = (base.bbox(), script.bbox());
    (is_superscript(&b, &s, ctx.cfg) && rises_steeply(&b, &s, ctx.cfg))
        || is_small_exponent(base, script, ctx)
}
