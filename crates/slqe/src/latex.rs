//! LaTeX rendering of a normalized infix expression.
//!
//! Purpose
//! - Give the caller a typeset form of what was recognised, next to the roots.
//!
//! Rules
//! - Each side of `=` is parsed with the solver's shunting-yard (letters are
//!   plain operands here) and rendered from the tree, so redundant brackets
//!   disappear and needed ones come back as `\left(...\right)`.
//! - `a/b` → `\frac{a}{b}`; `a^b` → `a^b`, or `a^{b}` once `b` is longer than
//!   one character.
//! - Products are juxtaposed (`2x`, `3\left(x+1\right)`) unless the right
//!   factor starts with a digit or a fraction, which gets `\times`.
//! - The result is wrapped in `$$...$$`.

use crate::error::EquationError;
use crate::solver::{infix_to_postfix, Op, Token};

/// Turns a normalized infix string into display LaTeX.
///
/// `process` treats a failure as cosmetic: it is logged and the LaTeX field
/// stays empty.
pub trait LatexRenderer {
    fn render(&self, expr: &str) -> Result<String, EquationError>;
}

/// The built-in renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultLatex;

impl LatexRenderer for DefaultLatex {
    fn render(&self, expr: &str) -> Result<String, EquationError> {
        let sides = expr
            .split('=')
            .map(|side| parse(side).map(|tree| tree.to_tex()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("$${}$$", sides.join("=")))
    }
}

#[derive(Debug)]
enum Tex {
    Atom(String),
    Neg(Box<Tex>),
    Bin(Op, Box<Tex>, Box<Tex>),
}

fn parse(side: &str) -> Result<Tex, EquationError> {
    let invalid = || EquationError::syntax("Invalid expression");
    let mut stack: Vec<Tex> = Vec::new();
    for token in infix_to_postfix(side)? {
        let node = match token {
            Token::Op(Op::Pos) => stack.pop().ok_or_else(invalid)?,
            Token::Op(Op::Neg) => Tex::Neg(Box::new(stack.pop().ok_or_else(invalid)?)),
            Token::Op(op) => {
                let b = stack.pop().ok_or_else(invalid)?;
                let a = stack.pop().ok_or_else(invalid)?;
                Tex::Bin(op, Box::new(a), Box::new(b))
            }
            other => Tex::Atom(other.to_string()),
        };
        stack.push(node);
    }
    match (stack.pop(), stack.is_empty()) {
        (Some(tree), true) => Ok(tree),
        _ => Err(invalid()),
    }
}

fn bracket(s: String) -> String {
    format!("\\left({s}\\right)")
}

impl Tex {
    fn is_sum(&self) -> bool {
        matches!(self, Tex::Bin(Op::Add | Op::Sub, ..))
    }

    fn wrapped_if(&self, wrap: bool) -> String {
        let s = self.to_tex();
        if wrap {
            bracket(s)
        } else {
            s
        }
    }

    fn to_tex(&self) -> String {
        match self {
            Tex::Atom(s) => s.clone(),
            Tex::Neg(a) => format!("-{}", a.wrapped_if(a.is_sum() || matches!(**a, Tex::Neg(_)))),
            Tex::Bin(op, a, b) => match op {
                Op::Add => {
                    format!("{}+{}", a.to_tex(), b.wrapped_if(matches!(**b, Tex::Neg(_))))
                }
                Op::Sub => format!(
                    "{}-{}",
                    a.to_tex(),
                    b.wrapped_if(b.is_sum() || matches!(**b, Tex::Neg(_)))
                ),
                Op::Mul => {
                    let left = a.wrapped_if(a.is_sum());
                    let right = b.wrapped_if(b.is_sum() || matches!(**b, Tex::Neg(_)));
                    let times = right.starts_with(|c: char| c.is_ascii_digit() || c == '.')
                        || right.starts_with("\\frac");
                    if times {
                        format!("{left}\\times{right}")
                    } else {
                        format!("{left}{right}")
                    }
                }
                Op::Div => format!("\\frac{{{}}}{{{}}}", a.to_tex(), b.to_tex()),
                _ => {
                    let base = a.wrapped_if(!matches!(**a, Tex::Atom(_)));
                    let exponent = b.to_tex();
                    if exponent.chars().count() > 1 {
                        format!("{base}^{{{exponent}}}")
                    } else {
                        format!("{base}^{exponent}")
                    }
                }
            },
        }
    }
}
