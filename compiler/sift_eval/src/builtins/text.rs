//! String splitting and joining.

use sift_diagnostic::{field_out_of_range, not_implemented};
use sift_ir::Type;
use sift_types::Registry;
use sift_value::{native, Array, EvalResult, Value};

use super::args;

pub(super) fn register(registry: &mut Registry) {
    registry.register(
        "cut",
        Type::tuple(vec![Type::string(), Type::string()]),
        Type::array(Type::string()),
        native(cut),
    );
    registry.register(
        "cut",
        Type::tuple(vec![Type::string(), Type::string(), Type::uint()]),
        Type::string(),
        native(cut_field),
    );
    registry.register(
        "join",
        Type::tuple(vec![Type::array(Type::string()), Type::string()]),
        Type::string(),
        native(join),
    );
}

/// Split on every occurrence of `sep`. An empty separator leaves the text
/// whole.
fn split<'t>(text: &'t str, sep: &'t str) -> Box<dyn Iterator<Item = &'t str> + 't> {
    if sep.is_empty() {
        Box::new(std::iter::once(text))
    } else {
        Box::new(text.split(sep))
    }
}

fn text_and_separator<'v>(fields: &'v [Value]) -> EvalResult<(&'v str, &'v str)> {
    match fields {
        [text, sep, ..] => text
            .as_str()
            .zip(sep.as_str())
            .ok_or_else(|| not_implemented("cut")),
        _ => Err(not_implemented("cut")),
    }
}

fn cut(input: &Value, out: &mut Value) -> EvalResult<()> {
    let (text, sep) = text_and_separator(args(input, "cut")?)?;
    let mut parts = Array::Str(Vec::new());
    for part in split(text, sep) {
        parts.push(Value::string(part));
    }
    *out = Value::array(parts);
    Ok(())
}

fn cut_field(input: &Value, out: &mut Value) -> EvalResult<()> {
    let fields = args(input, "cut")?;
    let (text, sep) = text_and_separator(fields)?;
    let n = fields
        .get(2)
        .and_then(Value::as_u64)
        .ok_or_else(|| not_implemented("cut"))?;
    let found = usize::try_from(n).ok().and_then(|i| split(text, sep).nth(i));
    match found {
        Some(part) => *out = Value::string(part),
        None => return Err(field_out_of_range(n, split(text, sep).count())),
    }
    Ok(())
}

fn join(input: &Value, out: &mut Value) -> EvalResult<()> {
    let [parts, sep] = args(input, "join")? else {
        return Err(not_implemented("join"));
    };
    let (Some(parts), Some(sep)) = (parts.as_array(), sep.as_str()) else {
        return Err(not_implemented("join"));
    };
    let mut joined = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            joined.push_str(sep);
        }
        part.print(&mut joined)?;
    }
    *out = Value::owned_string(joined);
    Ok(())
}
