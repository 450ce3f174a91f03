//! Text rendering of values.
//!
//! Tuple fields are separated by tabs; elements of arrays, maps and
//! sequences go one per line, with map entries printed as `key<TAB>value`.
//! Printing a sequence consumes it.

use std::fmt::Write;

use crate::{EvalResult, Value};

impl Value {
    /// Append the rendering of `self` to `out`.
    pub fn print(&self, out: &mut String) -> EvalResult<()> {
        match self {
            Value::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Value::UInt(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Real(v) => out.push_str(&format_real(*v)),
            Value::Str(s) => out.push_str(s),
            Value::Tuple(items) => {
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        out.push('\t');
                    }
                    v.print(out)?;
                }
            }
            Value::Array(array) => {
                for (i, v) in array.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    v.print(out)?;
                }
            }
            Value::Map(map) => {
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    k.print(out)?;
                    out.push('\t');
                    v.print(out)?;
                }
            }
            Value::Seq(seq) => {
                let mut first = true;
                while let Some(v) = seq.next()? {
                    if !first {
                        out.push('\n');
                    }
                    first = false;
                    v.print(out)?;
                }
            }
            Value::Reduce(r) => r.value().print(out)?,
        }
        Ok(())
    }

    /// Rendering as an owned string.
    pub fn to_text(&self) -> EvalResult<String> {
        let mut out = String::new();
        self.print(&mut out)?;
        Ok(out)
    }
}

/// Format a real like C's `%g`: six significant digits, trailing zeros
/// dropped, scientific notation outside `1e-4 ..< 1e6`.
pub fn format_real(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{x:.5e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if (-4..6).contains(&exp) {
        let decimals = (5 - exp) as usize;
        let fixed = format!("{x:.decimals$}");
        trim_zeros(&fixed).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
