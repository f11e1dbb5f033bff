//! Fraction resolution.
//!
//! Every `-` is a potential fraction bar. Leaves whose horizontal center lies
//! within the bar's extent go to the numerator (above the bar center) or the
//! denominator (below). A bar with both sides non-empty becomes a candidate
//! covering the contiguous leaf range from its leftmost to its rightmost
//! member. Candidates nested inside a larger candidate are dropped before
//! either side is assembled; the larger one re-assembles them recursively.

use std::ops::Range;

use super::assemble::assemble_elements;
use super::position::Ctx;
use super::types::{Composite, Element};
use crate::error::EquationError;

/// Characters that force parentheses around a numerator or denominator.
const FRACTION_SIDE_OPERATORS: &[char] = &['+', '*', '/', '=', '^', '-'];

pub(crate) fn wrap_if_contains(text: String, operators: &[char]) -> String {
    if text.contains(operators) {
        format!("({text})")
    } else {
        text
    }
}

/// A bar with both sides populated, located by geometry only.
struct Candidate {
    numerator: Vec<usize>,
    denominator: Vec<usize>,
    members: Range<usize>,
}

fn candidate(elements: &[Element], bar: usize) -> Option<Candidate> {
    let bar_box = elements[bar].bbox;
    let (left, right) = (bar_box.left(), bar_box.right());
    let (mut numerator, mut denominator) = (Vec::new(), Vec::new());
    let (mut lo, mut hi) = (bar, bar);
    for (j, e) in elements.iter().enumerate() {
        if j == bar {
            continue;
        }
        let c = e.bbox.center;
        if c.x < left || c.x > right {
            continue;
        }
        if c.y < bar_box.center.y {
            numerator.push(j);
        } else if c.y > bar_box.center.y {
            denominator.push(j);
        } else {
            continue;
        }
        lo = lo.min(j);
        hi = hi.max(j);
    }
    (!numerator.is_empty() && !denominator.is_empty()).then_some(Candidate {
        numerator,
        denominator,
        members: lo..hi + 1,
    })
}

/// Assemble both sides of a surviving candidate into one composite.
fn resolve(
    elements: &[Element],
    c: Candidate,
    ctx: &Ctx,
    depth: usize,
) -> Result<Composite, EquationError> {
    let side = |indices: &[usize]| -> Result<String, EquationError> {
        let leaves = indices.iter().map(|&j| elements[j].clone()).collect();
        Ok(wrap_if_contains(
            assemble_elements(leaves, ctx, depth + 1)?,
            FRACTION_SIDE_OPERATORS,
        ))
    };
    let num = side(&c.numerator)?;
    let den = side(&c.denominator)?;
    let bbox = elements[c.members.clone()]
        .iter()
        .skip(1)
        .fold(elements[c.members.start].ink, |acc, e| acc.union(&e.ink));
    Ok(Composite {
        expression: format!("{num}/{den}"),
        bbox,
        members: c.members,
    })
}

/// Outermost fraction candidates of one level, sorted by first member.
///
/// Subsumed candidates are dropped before any side is assembled, so each
/// inner bar is resolved once, by the level that owns it.
/// `elements` must already be sorted by left edge.
pub(crate) fn find_fractions(
    elements: &[Element],
    ctx: &Ctx,
    depth: usize,
) -> Result<Vec<Composite>, EquationError> {
    let candidates: Vec<Candidate> = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.expression == "-")
        .filter_map(|(i, _)| candidate(elements, i))
        .collect();

    // Drop every candidate whose range lies inside another live candidate.
    let mut alive = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        if !alive[i] {
            continue;
        }
        let outer = candidates[i].members.clone();
        for (j, other) in candidates.iter().enumerate() {
            if j != i
                && alive[j]
                && outer.start <= other.members.start
                && other.members.end <= outer.end
            {
                alive[j] = false;
            }
        }
    }
    let mut kept = candidates
        .into_iter()
        .zip(alive)
        .filter_map(|(c, keep)| keep.then_some(c))
        .map(|c| resolve(elements, c, ctx, depth))
        .collect::<Result<Vec<_>, _>>()?;
    kept.sort_by_key(|c| c.members.start);
    tracing::trace!(depth, fractions = kept.len(), "fractions resolved");
    Ok(kept)
}
