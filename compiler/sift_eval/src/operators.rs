//! Operator implementations for the executor.
//!
//! Operand types are fixed by inference, so dispatch is a plain match over
//! value pairs. Integer arithmetic is checked; mixed signed and unsigned
//! operands compute in `i64`, as does unsigned subtraction.

use sift_diagnostic::{
    corrupt_state, division_by_zero, integer_overflow, negative_exponent, not_implemented,
};
use sift_ir::Op;
use sift_value::{EvalResult, Value};

#[inline]
fn checked<T>(result: Option<T>, wrap: fn(T) -> Value, op_name: &'static str) -> EvalResult {
    result.map(wrap).ok_or_else(|| integer_overflow(op_name))
}

#[inline]
fn guarded<T, F>(zero: bool, op: F, wrap: fn(T) -> Value, op_name: &'static str) -> EvalResult
where
    F: FnOnce() -> Option<T>,
{
    if zero {
        Err(division_by_zero())
    } else {
        checked(op(), wrap, op_name)
    }
}

fn op_name(op: Op) -> &'static str {
    match op {
        Op::Add => "addition",
        Op::Sub => "subtraction",
        Op::Mul => "multiplication",
        Op::Div => "division",
        Op::Mod => "remainder",
        Op::Pow => "exponentiation",
        _ => "arithmetic",
    }
}

fn signed(v: u64, op: Op) -> EvalResult<i64> {
    i64::try_from(v).map_err(|_| integer_overflow(op_name(op)))
}

/// Apply a binary operator.
pub fn binary(op: Op, left: &Value, right: &Value) -> EvalResult {
    match op {
        Op::Eq => return Ok(truth(left == right)),
        Op::Lt => return Ok(truth(left < right)),
        _ => {}
    }
    match (&*left.plain(), &*right.plain()) {
        (Value::Real(a), Value::Real(b)) => real_binary(op, *a, *b),
        (Value::UInt(a), Value::UInt(b)) if op != Op::Sub => uint_binary(op, *a, *b),
        (Value::UInt(a), Value::UInt(b)) => int_binary(op, signed(*a, op)?, signed(*b, op)?),
        (Value::Int(a), Value::Int(b)) => int_binary(op, *a, *b),
        (Value::Int(a), Value::UInt(b)) if is_bitwise(op) => int_binary(op, *a, *b as i64),
        (Value::UInt(a), Value::Int(b)) if is_bitwise(op) => int_binary(op, *a as i64, *b),
        (Value::Int(a), Value::UInt(b)) => int_binary(op, *a, signed(*b, op)?),
        (Value::UInt(a), Value::Int(b)) => int_binary(op, signed(*a, op)?, *b),
        _ => Err(not_implemented(op.symbol())),
    }
}

fn is_bitwise(op: Op) -> bool {
    matches!(op, Op::And | Op::Or | Op::Xor)
}

fn truth(b: bool) -> Value {
    Value::UInt(u64::from(b))
}

fn int_binary(op: Op, a: i64, b: i64) -> EvalResult {
    let name = op_name(op);
    match op {
        Op::Add => checked(a.checked_add(b), Value::Int, name),
        Op::Sub => checked(a.checked_sub(b), Value::Int, name),
        Op::Mul => checked(a.checked_mul(b), Value::Int, name),
        Op::Div => guarded(b == 0, || a.checked_div(b), Value::Int, name),
        Op::Mod => guarded(b == 0, || a.checked_rem(b), Value::Int, name),
        Op::Pow => {
            if b < 0 {
                return Err(negative_exponent());
            }
            let exp = u32::try_from(b).map_err(|_| integer_overflow(name))?;
            checked(a.checked_pow(exp), Value::Int, name)
        }
        Op::And => Ok(Value::Int(a & b)),
        Op::Or => Ok(Value::Int(a | b)),
        Op::Xor => Ok(Value::Int(a ^ b)),
        _ => Err(not_implemented(op.symbol())),
    }
}

fn uint_binary(op: Op, a: u64, b: u64) -> EvalResult {
    let name = op_name(op);
    match op {
        Op::Add => checked(a.checked_add(b), Value::UInt, name),
        Op::Mul => checked(a.checked_mul(b), Value::UInt, name),
        Op::Div => guarded(b == 0, || a.checked_div(b), Value::UInt, name),
        // `%` always yields a signed result.
        Op::Mod => int_binary(op, signed(a, op)?, signed(b, op)?),
        Op::Pow => {
            let exp = u32::try_from(b).map_err(|_| integer_overflow(name))?;
            checked(a.checked_pow(exp), Value::UInt, name)
        }
        Op::And => Ok(Value::UInt(a & b)),
        Op::Or => Ok(Value::UInt(a | b)),
        Op::Xor => Ok(Value::UInt(a ^ b)),
        _ => Err(not_implemented(op.symbol())),
    }
}

fn real_binary(op: Op, a: f64, b: f64) -> EvalResult {
    Ok(Value::Real(match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Pow => a.powf(b),
        _ => return Err(not_implemented(op.symbol())),
    }))
}

/// Apply `!` or `~`.
pub fn unary(op: Op, operand: &Value) -> EvalResult {
    match (op, &*operand.plain()) {
        (Op::Not, Value::Int(v)) => Ok(truth(*v == 0)),
        (Op::Not, Value::UInt(v)) => Ok(truth(*v == 0)),
        (Op::BitNot, Value::Int(v)) => Ok(Value::Int(!v)),
        (Op::BitNot, Value::UInt(v)) => Ok(Value::UInt(!v)),
        _ => Err(not_implemented(op.symbol())),
    }
}

/// Integer to real.
pub fn to_real(value: &Value) -> EvalResult {
    match &*value.plain() {
        Value::Int(v) => Ok(Value::Real(*v as f64)),
        Value::UInt(v) => Ok(Value::Real(*v as f64)),
        Value::Real(v) => Ok(Value::Real(*v)),
        _ => Err(corrupt_state("converting a non-integer to real")),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
