//! Scalar conversions.

use sift_diagnostic::{conversion_failed, integer_overflow, not_implemented};
use sift_ir::{AtomType, Type};
use sift_types::{Registry, Resolution};
use sift_value::{native, EvalResult, NativeFn, Value};

pub(super) fn register(registry: &mut Registry) {
    for (name, target) in [
        ("int", AtomType::Int),
        ("uint", AtomType::UInt),
        ("real", AtomType::Real),
    ] {
        registry.register_poly(name, move |arg: &Type| {
            arg.atom()
                .map(|_| Resolution::new(Type::Atom(target), converter(target)))
        });
    }
    registry.register_poly("string", |arg: &Type| {
        arg.atom().map(|_| {
            Resolution::new(
                Type::string(),
                native(|input, out| {
                    *out = Value::owned_string(input.to_text()?);
                    Ok(())
                }),
            )
        })
    });
    registry.register_poly("abs", |arg: &Type| {
        arg.is_numeric().then(|| Resolution::new(arg.clone(), native(abs)))
    });
}

fn converter(target: AtomType) -> NativeFn {
    native(move |input, out| {
        *out = convert(target, input)?;
        Ok(())
    })
}

fn target_name(target: AtomType) -> &'static str {
    match target {
        AtomType::Int => "an integer",
        AtomType::UInt => "an unsigned integer",
        AtomType::Real => "a floating-point number",
        AtomType::String => "a string",
    }
}

fn convert(target: AtomType, input: &Value) -> EvalResult {
    let fail = |v: &dyn ToString| conversion_failed(v.to_string(), target_name(target));
    match (target, &*input.plain()) {
        (_, Value::Str(s)) => parse(target, s),
        (AtomType::Int, Value::Int(x)) => Ok(Value::Int(*x)),
        (AtomType::Int, Value::UInt(x)) => i64::try_from(*x).map(Value::Int).map_err(|_| fail(x)),
        (AtomType::Int, Value::Real(x)) => Ok(Value::Int(*x as i64)),
        (AtomType::UInt, Value::Int(x)) => u64::try_from(*x).map(Value::UInt).map_err(|_| fail(x)),
        (AtomType::UInt, Value::UInt(x)) => Ok(Value::UInt(*x)),
        (AtomType::UInt, Value::Real(x)) if *x >= 0.0 => Ok(Value::UInt(*x as u64)),
        (AtomType::UInt, Value::Real(x)) => Err(fail(x)),
        (AtomType::Real, v) => v.to_f64().map(Value::Real).ok_or_else(|| not_implemented("real")),
        _ => Err(not_implemented("conversion")),
    }
}

fn parse(target: AtomType, text: &str) -> EvalResult {
    let trimmed = text.trim();
    let parsed = match target {
        AtomType::Int => trimmed.parse().ok().map(Value::Int),
        AtomType::UInt => trimmed.parse().ok().map(Value::UInt),
        AtomType::Real => trimmed.parse().ok().map(Value::Real),
        AtomType::String => Some(Value::string(text)),
    };
    parsed.ok_or_else(|| conversion_failed(text, target_name(target)))
}

fn abs(input: &Value, out: &mut Value) -> EvalResult<()> {
    *out = match &*input.plain() {
        Value::Int(x) => x
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("abs"))?,
        Value::UInt(x) => Value::UInt(*x),
        Value::Real(x) => Value::Real(x.abs()),
        _ => return Err(not_implemented("abs")),
    };
    Ok(())
}
