//! Expression assembly: detections to a raw infix string.
//!
//! Per level: sort leaves by left edge, collapse outermost fractions into
//! composite nodes, then walk the resulting stream left to right, resolving
//! exponents and bracketing fractions that bind to their neighbours. Nested
//! levels (fraction sides, scripts) re-enter `assemble_elements` with
//! `depth + 1`, bounded by `GeometryCfg::max_depth`.

use super::exponent::{check_depth, resolve_exponent};
use super::fraction::find_fractions;
use super::glyph::{GlyphMetrics, ReferenceGlyphs};
use super::position::{
    is_closing_bracket, is_exponent, is_opening_bracket, is_operator, is_raised, Ctx,
};
use super::types::{Composite, Detection, Element, GeometryCfg, Node};
use crate::error::EquationError;

/// Assemble with default geometry and the reference glyph table.
pub fn assemble(detections: &[Detection]) -> Result<String, EquationError> {
    assemble_with(detections, &GeometryCfg::default(), &ReferenceGlyphs)
}

pub fn assemble_with(
    detections: &[Detection],
    cfg: &GeometryCfg,
    glyphs: &dyn GlyphMetrics,
) -> Result<String, EquationError> {
    let ctx = Ctx { cfg, glyphs };
    let elements = detections
        .iter()
        .map(|d| Element::from_detection(d, cfg))
        .collect();
    let expression = assemble_elements(elements, &ctx, 0)?;
    tracing::debug!(detections = detections.len(), expression = %expression, "assembled");
    Ok(expression)
}

/// Whether a fraction between `left` and `right` must be parenthesised.
///
/// True when the right neighbour is made of letters only, is `*`, `:`, `/` or
/// an opening bracket, or the left neighbour is a closing bracket, `:` or `/`.
///
/// `right` may be a whole fraction expression such as `x/2`, which does not
/// bind.
pub fn should_add_bracket(left: &str, right: &str) -> bool {
    let right_binds = (!right.is_empty() && right.chars().all(char::is_alphabetic))
        || matches!(right, "*" | ":" | "/")
        || is_opening_bracket(right);
    let left_binds = is_closing_bracket(left) || matches!(left, ":" | "/");
    right_binds || left_binds
}

pub(crate) fn assemble_elements(
    mut leaves: Vec<Element>,
    ctx: &Ctx,
    depth: usize,
) -> Result<String, EquationError> {
    check_depth(depth, ctx)?;
    leaves.sort_by(|a, b| a.ink.left().total_cmp(&b.ink.left()));
    let fractions = find_fractions(&leaves, ctx, depth)?;
    let stream = splice(&leaves, fractions);
    let resolved = resolve(&leaves, &stream, ctx, depth)?;
    Ok(render(&resolved))
}

/// Leaves with every fraction range replaced by its composite.
fn splice(leaves: &[Element], fractions: Vec<Composite>) -> Vec<Node> {
    let mut stream = Vec::with_capacity(leaves.len());
    let mut fractions = fractions.into_iter().peekable();
    let mut i = 0;
    while i < leaves.len() {
        // Skip candidates overlapping something already emitted.
        while fractions.peek().is_some_and(|f| f.members.start < i) {
            fractions.next();
        }
        match fractions.next_if(|f| f.members.start == i) {
            Some(f) => {
                i = f.members.end;
                stream.push(Node::Fraction(f));
            }
            None => {
                stream.push(Node::Plain {
                    index: i,
                    element: leaves[i].clone(),
                });
                i += 1;
            }
        }
    }
    stream
}

fn resolve(
    leaves: &[Element],
    stream: &[Node],
    ctx: &Ctx,
    depth: usize,
) -> Result<Vec<Node>, EquationError> {
    let mut out = Vec::with_capacity(stream.len());
    let mut i = 0;
    while i < stream.len() {
        let cur = &stream[i];
        let next = stream.get(i + 1);
        if let Some(next) = next {
            if is_exponent(cur, next, ctx) && !operator_starts_new_term(stream, i, ctx) {
                let (exponent, end) = resolve_exponent(leaves, stream, i, ctx, depth)?;
                out.push(Node::Exponent(exponent));
                i = end + 1;
                continue;
            }
        }
        match cur {
            Node::Fraction(f) => {
                let left = f
                    .members
                    .start
                    .checked_sub(1)
                    .map_or("", |k| leaves[k].expression.as_str());
                let right = next.map_or("", Node::expression);
                let mut f = f.clone();
                if should_add_bracket(left, right) {
                    f.expression = format!("({})", f.expression);
                }
                out.push(Node::Fraction(f));
            }
            other => out.push(other.clone()),
        }
        i += 1;
    }
    Ok(out)
}

/// A raised operator right after `stream[i]` whose follower drops back down.
fn operator_starts_new_term(stream: &[Node], i: usize, ctx: &Ctx) -> bool {
    match (stream.get(i + 1), stream.get(i + 2)) {
        (Some(op), Some(after)) if is_operator(op.expression()) => !is_raised(&stream[i], after, ctx),
        _ => false,
    }
}

/// Concatenate node texts; an exponent is followed by `.` (product) unless an operator comes next.
fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    for (k, node) in nodes.iter().enumerate() {
        out.push_str(node.expression());
        if let Node::Exponent(_) = node {
            let operator_next = matches!(
                nodes.get(k + 1),
                Some(Node::Plain { element, .. }) if is_operator(&element.expression)
            );
            if k + 1 < nodes.len() && !operator_next {
                out.push('.');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_rule_matches_neighbour_table() {
        assert!(should_add_bracket("", "x"));
        assert!(should_add_bracket("+", "("));
        assert!(should_add_bracket(")", "+"));
        assert!(should_add_bracket("/", ""));
        assert!(should_add_bracket("", "*"));
        assert!(!should_add_bracket("+", "-"));
        assert!(!should_add_bracket("", ""));
        assert!(!should_add_bracket("2", "="));
    }

    #[test]
    fn fraction_on_the_right_does_not_bind() {
        assert!(should_add_bracket("", "xy"));
        assert!(!should_add_bracket("", "x/2"));
        assert!(!should_add_bracket("+", "x2"));
    }
}
