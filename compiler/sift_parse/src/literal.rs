//! Literal conversion.

use sift_ir::Atom;

/// Why a literal could not be converted; the message names the target.
#[derive(Debug, PartialEq, Eq)]
pub struct BadLiteral(pub &'static str);

const INTEGER: BadLiteral = BadLiteral("an integer");
const UNSIGNED: BadLiteral = BadLiteral("an unsigned integer");
const FLOAT: BadLiteral = BadLiteral("a floating-point number");

/// Bare digits, with an optional `u` suffix.
pub fn unsigned(text: &str) -> Result<Atom, BadLiteral> {
    let digits = text.strip_suffix('u').unwrap_or(text);
    digits.parse().map(Atom::UInt).map_err(|_| UNSIGNED)
}

/// `0x` followed by hex digits.
pub fn hex(text: &str) -> Result<Atom, BadLiteral> {
    let digits = text.get(2..).unwrap_or_default();
    u64::from_str_radix(digits, 16)
        .map(Atom::UInt)
        .map_err(|_| UNSIGNED)
}

/// Digits with an optional signed suffix, optionally negated.
pub fn signed(text: &str, negative: bool) -> Result<Atom, BadLiteral> {
    let digits = text.trim_end_matches(['s', 'l', 'i', 'u']);
    let parsed = if negative {
        format!("-{digits}").parse()
    } else {
        digits.parse()
    };
    parsed.map(Atom::Int).map_err(|_| INTEGER)
}

pub fn float(text: &str, negative: bool) -> Result<Atom, BadLiteral> {
    let v: f64 = text.parse().map_err(|_| FLOAT)?;
    Ok(Atom::Real(if negative { -v } else { v }))
}

/// Strip the quotes and resolve escapes. `\t \n \r \e` are control
/// characters; any other escaped character stands for itself.
pub fn string(text: &str) -> String {
    let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('e') => out.push('\x1b'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
