//! Natives behind the `Index` instruction.
//!
//! Each native receives the tuple `(container, index...)` built by the
//! instruction's argument block.

use sift_diagnostic::{field_out_of_range, index_out_of_bounds, key_not_found, not_implemented};

use crate::{native, EvalResult, NativeFn, Value};

fn args(input: &Value) -> EvalResult<&[Value]> {
    input.as_tuple().ok_or_else(|| not_implemented("index"))
}

/// Resolve an array position: unsigned as is, negative signed counting from
/// the end, reals as a fraction of `len - 1`.
pub fn position(len: usize, index: &Value) -> EvalResult<usize> {
    let pos = match &*index.plain() {
        Value::UInt(i) => usize::try_from(*i).ok(),
        Value::Int(i) if *i < 0 => usize::try_from(i.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back)),
        Value::Int(i) => usize::try_from(*i).ok(),
        Value::Real(z) if (0.0..=1.0).contains(z) => Some((len.saturating_sub(1) as f64 * z) as usize),
        Value::Real(_) => None,
        _ => return Err(not_implemented("index")),
    };
    match pos {
        Some(p) if p < len => Ok(p),
        _ => Err(index_out_of_bounds()),
    }
}

fn range(len: usize, from: &Value, to: &Value) -> EvalResult<(usize, usize)> {
    let from = position(len, from)?;
    let to = position(len, to)?;
    if from > to {
        return Err(index_out_of_bounds());
    }
    Ok((from, to))
}

/// `array[i]`
pub fn array_element() -> NativeFn {
    native(|input, out| {
        let [container, ix] = args(input)? else {
            return Err(not_implemented("index"));
        };
        let array = container.as_array().ok_or_else(|| not_implemented("index"))?;
        let pos = position(array.len(), ix)?;
        *out = array.get(pos).ok_or_else(index_out_of_bounds)?;
        Ok(())
    })
}

/// `array[i, j]`, inclusive.
pub fn array_slice() -> NativeFn {
    native(|input, out| {
        let [container, from, to] = args(input)? else {
            return Err(not_implemented("slice"));
        };
        let array = container.as_array().ok_or_else(|| not_implemented("slice"))?;
        let (from, to) = range(array.len(), from, to)?;
        *out = Value::array(array.slice(from, to));
        Ok(())
    })
}

/// `string[i, j]`, inclusive and counted in characters.
pub fn substring() -> NativeFn {
    native(|input, out| {
        let [container, from, to] = args(input)? else {
            return Err(not_implemented("substring"));
        };
        let s = container.as_str().ok_or_else(|| not_implemented("substring"))?;
        let (from, to) = range(s.chars().count(), from, to)?;
        *out = Value::owned_string(s.chars().skip(from).take(to - from + 1).collect());
        Ok(())
    })
}

/// `map[k]` or `map[k1, k2, ...]` with a tuple key.
pub fn map_lookup() -> NativeFn {
    native(|input, out| {
        let Some((container, keys)) = args(input)?.split_first() else {
            return Err(not_implemented("lookup"));
        };
        let map = container.as_map().ok_or_else(|| not_implemented("lookup"))?;
        let found = match keys {
            [key] => map.get(key),
            keys => map.get(&Value::tuple(keys.to_vec())),
        };
        *out = found.cloned().ok_or_else(key_not_found)?;
        Ok(())
    })
}

/// `tuple[i]` for a literal `i` checked at compile time.
pub fn tuple_field(field: usize) -> NativeFn {
    native(move |input, out| {
        let Some(tuple) = args(input)?.first() else {
            return Err(not_implemented("field"));
        };
        let fields = tuple.as_tuple().ok_or_else(|| not_implemented("field"))?;
        *out = fields
            .get(field)
            .cloned()
            .ok_or_else(|| field_out_of_range(field as u64, fields.len()))?;
        Ok(())
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
