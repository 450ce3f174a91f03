//! The core builtin library.
//!
//! | Module | Functions |
//! |--------|-----------|
//! | [`convert`] | `int`, `uint`, `real`, `string`, `abs` |
//! | [`text`] | `cut`, `join` |
//! | [`collections`] | `array`, `sort`, `reverse`, `count`, `head`, `flatten`, `filter` |
//! | [`reducers`] | `sum`, `min`, `max`, `avg`, `var`, `stdev`, `uniques` |
//! | [`logic`] | `if` |
//!
//! Every function is registered through a checker on the argument type, so
//! one name covers all the shapes it accepts. Anything a checker rejects
//! falls through to lifting over sequences in the registry.

mod collections;
mod convert;
mod logic;
mod reducers;
mod text;

use sift_diagnostic::not_implemented;
use sift_types::Registry;
use sift_value::{EvalResult, Value};

/// Registry holding the core builtin set.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    convert::register(&mut registry);
    text::register(&mut registry);
    collections::register(&mut registry);
    reducers::register(&mut registry);
    logic::register(&mut registry);
    registry
}

/// Fields of a tuple argument.
fn args<'v>(input: &'v Value, function: &'static str) -> EvalResult<&'v [Value]> {
    input.as_tuple().ok_or_else(|| not_implemented(function))
}

/// An integer flag: anything but zero is true.
fn truth(flag: &Value, function: &'static str) -> EvalResult<bool> {
    match &*flag.plain() {
        Value::Int(v) => Ok(*v != 0),
        Value::UInt(v) => Ok(*v != 0),
        _ => Err(not_implemented(function)),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
