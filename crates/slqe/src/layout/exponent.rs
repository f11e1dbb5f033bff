//! Exponent resolution over the assembler stream.
//!
//! The scan extends a script greedily to the right while every node stays
//! raised relative to the original base. It stops at `=`, at a node that drops
//! into the subscript zone of the previous script node (a decimal separator is
//! let through when the node after it is still on the script line), and at an
//! operator whose follower is no longer raised. Nested exponents inside the
//! script are resolved recursively and skipped over.

use super::assemble::assemble_elements;
use super::fraction::wrap_if_contains;
use super::position::{
    is_decimal_separator, is_exponent, is_inline_operator, is_operator, is_raised, is_subscript,
    is_superscript, Ctx,
};
use super::types::{Composite, Element, Node};
use crate::error::EquationError;

/// Characters that force parentheses around a script.
const SCRIPT_OPERATORS: &[char] = &['+', '*', '/', '=', '-'];

pub(crate) fn check_depth(depth: usize, ctx: &Ctx) -> Result<(), EquationError> {
    if depth > ctx.cfg.max_depth {
        return Err(EquationError::DepthExceeded {
            depth,
            limit: ctx.cfg.max_depth,
        });
    }
    Ok(())
}

/// Index of the last stream node belonging to the script of `base` that starts at `start`.
pub(crate) fn script_end(
    stream: &[Node],
    base: &Node,
    start: usize,
    ctx: &Ctx,
    depth: usize,
) -> Result<usize, EquationError> {
    check_depth(depth, ctx)?;
    let cfg = ctx.cfg;
    let base_box = base.bbox();
    let (mut end, mut anchor) = (start, start);
    while let Some(cur) = stream.get(end + 1) {
        let prev = &stream[anchor];
        let label = cur.expression();
        if label == "=" {
            break;
        }
        if is_subscript(&prev.bbox(), &cur.bbox(), cfg) || !is_raised(base, cur, ctx) {
            let decimal_continues = is_decimal_separator(label)
                && stream
                    .get(end + 2)
                    .is_some_and(|after| !is_subscript(&prev.bbox(), &after.bbox(), cfg));
            if !decimal_continues {
                break;
            }
        }
        if is_operator(label) {
            if is_inline_operator(&base_box, &cur.bbox(), cfg)
                && !is_superscript(&base_box, &cur.bbox(), cfg)
            {
                break;
            }
            if let Some(after) = stream.get(end + 2) {
                if !is_raised(base, after, ctx) {
                    break;
                }
            }
        }
        if is_exponent(prev, cur, ctx) {
            end = script_end(stream, prev, end + 1, ctx, depth + 1)?;
        } else {
            end += 1;
            anchor = end;
        }
    }
    Ok(end)
}

/// Resolve the exponent whose base is `stream[base]`; returns the node and the last consumed index.
pub(crate) fn resolve_exponent(
    leaves: &[Element],
    stream: &[Node],
    base: usize,
    ctx: &Ctx,
    depth: usize,
) -> Result<(Composite, usize), EquationError> {
    let base_node = &stream[base];
    let end = script_end(stream, base_node, base + 1, ctx, depth + 1)?;
    let script_leaves = leaves[stream[base + 1].members().start..stream[end].members().end].to_vec();
    let script = wrap_if_contains(assemble_elements(script_leaves, ctx, depth + 1)?, SCRIPT_OPERATORS);
    let base_text = match base_node {
        Node::Fraction(c) => format!("({})", c.expression),
        other => other.expression().to_string(),
    };
    let bbox = stream[base + 1..=end]
        .iter()
        .fold(base_node.bbox(), |acc, n| acc.union(&n.bbox()));
    tracing::trace!(base = %base_text, script = %script, "exponent resolved");
    Ok((
        Composite {
            expression: format!("{base_text}^{script}"),
            bbox,
            members: base_node.members().start..stream[end].members().end,
        },
        end,
    ))
}
