//! Canonical infix form of an assembled expression.
//!
//! 1. Insert `*` for implicit products (`2x`, `x2`, `xy`, `2(`, `)(`, `)x`).
//! 2. Translate OCR punctuation: `.`→`*`, `,`→`.`, `{[`→`(`, `}]`→`)`, `:`→`/`.
//! 3. Strip leading zeros from integer digit runs (`0004`→`4`, `000.1`→`0.1`).

use crate::layout::position::{is_closing_bracket, is_opening_bracket};

fn is_bracket_open(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_opening_bracket(c.encode_utf8(&mut buf))
}

fn is_bracket_close(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_closing_bracket(c.encode_utf8(&mut buf))
}

/// Whether an implicit `*` belongs between `prev` and `cur`.
pub fn needs_product(prev: char, cur: char) -> bool {
    let operand = |c: char| c.is_ascii_digit() || c.is_alphabetic();
    (prev.is_ascii_digit() && cur.is_alphabetic())
        || (prev.is_alphabetic() && operand(cur))
        || ((operand(prev) || is_bracket_close(prev)) && is_bracket_open(cur))
        || (is_bracket_close(prev) && operand(cur))
}

fn translate(c: char) -> char {
    match c {
        '.' => '*',
        ',' => '.',
        '{' | '[' => '(',
        '}' | ']' => ')',
        ':' => '/',
        other => other,
    }
}

pub fn normalize(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() * 2);
    let mut prev = None;
    for c in expr.chars() {
        if prev.is_some_and(|p| needs_product(p, c)) {
            out.push('*');
        }
        out.push(translate(c));
        prev = Some(c);
    }
    strip_leading_zeros(&out)
}

/// Integer digit runs lose leading zeros; one zero stays if nothing else is left.
/// Runs right after `.` are fractional and kept as written.
fn strip_leading_zeros(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let fractional = i > 0 && chars[i - 1] == '.';
        if !c.is_ascii_digit() || fractional {
            out.push(c);
            i += 1;
            while fractional && i < chars.len() && chars[i].is_ascii_digit() {
                out.push(chars[i]);
                i += 1;
            }
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let run: String = chars[start..i].iter().collect();
        match run.trim_start_matches('0') {
            "" => out.push('0'),
            digits => out.push_str(digits),
        }
    }
    out
}
