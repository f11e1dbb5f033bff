//! Tokenizer and infix→postfix conversion (shunting-yard).
//!
//! Conventions
//! - Runs of digits and `.` form one numeric literal; the literal is parsed
//!   only when evaluated, so `1.2.3` surfaces as an unsupported token.
//! - `-`/`+` at the start, after an opening bracket or after another operator
//!   become the unary `neg`/`pos`.
//! - Precedence: `+ -` 0, `* /` 2, `^ neg pos` 3; `^ neg pos` are right-associative.

use std::fmt;

use crate::error::EquationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Pos,
}

impl Op {
    fn from_char(c: char) -> Option<Op> {
        Some(match c {
            '+' => Op::Add,
            '-' => Op::Sub,
            '*' => Op::Mul,
            '/' => Op::Div,
            '^' => Op::Pow,
            _ => return None,
        })
    }

    pub fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 0,
            Op::Mul | Op::Div => 2,
            Op::Pow | Op::Neg | Op::Pos => 3,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, Op::Pow | Op::Neg | Op::Pos)
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Op::Neg | Op::Pos)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Pow => "^",
            Op::Neg => "neg",
            Op::Pos => "pos",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Numeric literal as written.
    Number(String),
    /// A single letter.
    Symbol(char),
    Op(Op),
    Open(char),
    Close(char),
    /// Anything else; rejected by the postfix conversion.
    Unknown(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(s) => f.write_str(s),
            Token::Symbol(c) | Token::Open(c) | Token::Close(c) | Token::Unknown(c) => {
                write!(f, "{c}")
            }
            Token::Op(op) => f.write_str(op.symbol()),
        }
    }
}

fn opening_of(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

pub fn tokenize(expr: &str) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(expr.len());
    for c in expr.chars() {
        let numeric = c.is_ascii_digit() || c == '.';
        if numeric {
            if let Some(Token::Number(s)) = out.last_mut() {
                s.push(c);
                continue;
            }
            out.push(Token::Number(c.to_string()));
            continue;
        }
        out.push(match c {
            '(' | '[' | '{' => Token::Open(c),
            ')' | ']' | '}' => Token::Close(c),
            c if c.is_alphabetic() => Token::Symbol(c),
            c => Op::from_char(c).map_or(Token::Unknown(c), Token::Op),
        });
    }
    // Unary signs.
    for i in 0..out.len() {
        let leading = i == 0 || matches!(out[i - 1], Token::Open(_) | Token::Op(_));
        if leading {
            match out[i] {
                Token::Op(Op::Sub) => out[i] = Token::Op(Op::Neg),
                Token::Op(Op::Add) => out[i] = Token::Op(Op::Pos),
                _ => {}
            }
        }
    }
    out
}

/// Reorder `tokens` into postfix. Numbers and letters are both operands here.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, EquationError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();
    for token in tokens {
        match token {
            Token::Number(_) | Token::Symbol(_) => out.push(token),
            Token::Open(_) => stack.push(token),
            Token::Close(close) => loop {
                match stack.pop() {
                    Some(Token::Op(op)) => out.push(Token::Op(op)),
                    Some(Token::Open(open)) if open == opening_of(close) => break,
                    _ => {
                        return Err(EquationError::syntax(format!(
                            "Cannot find corresponding opening bracket of: {close}"
                        )))
                    }
                }
            },
            Token::Op(op) => {
                while let Some(&Token::Op(top)) = stack.last() {
                    let (p, q) = (op.precedence(), top.precedence());
                    if p < q || (p == q && !op.is_right_associative()) {
                        out.push(Token::Op(top));
                        stack.pop();
                    } else {
                        break;
                    }
                }
                stack.push(Token::Op(op));
            }
            Token::Unknown(c) => {
                return Err(EquationError::syntax(format!("Token is not supported: {c}")))
            }
        }
    }
    while let Some(token) = stack.pop() {
        match token {
            Token::Op(_) => out.push(token),
            _ => return Err(EquationError::syntax("Invalid expression")),
        }
    }
    Ok(out)
}

/// `tokenize` then `to_postfix`.
pub fn infix_to_postfix(expr: &str) -> Result<Vec<Token>, EquationError> {
    to_postfix(tokenize(expr))
}
