//! Runtime errors and their constructors.
//!
//! Builtins and the executor build errors through the functions below rather
//! than naming variants, so message wording lives in one place.

use thiserror::Error;

/// Failure while running a compiled program.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Array index out of bounds")]
    IndexOutOfBounds,

    #[error("Key is not in map")]
    KeyNotFound,

    #[error("Field index {index} is out of range for {count} fields")]
    FieldOutOfRange { index: u64, count: usize },

    #[error("{function}() of an empty sequence")]
    EmptyInput { function: &'static str },

    #[error("Could not convert '{value}' to {target}")]
    Conversion { value: String, target: &'static str },

    #[error("Integer overflow in {0}")]
    Overflow(&'static str),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Negative exponent in integer power")]
    NegativeExponent,

    #[error("Condition of if() is false and there is no else value")]
    ConditionFalse,

    #[error("Sequence is already being iterated")]
    AlreadyIterating,

    #[error("'{0}' is not implemented for this value")]
    NotImplemented(&'static str),

    #[error("Could not read input: {0}")]
    Input(String),

    #[error("Sanity error: {0}")]
    Corrupt(&'static str),

    #[error("Worker {worker} failed: {message}")]
    Worker { worker: usize, message: String },
}

#[cold]
pub fn index_out_of_bounds() -> RuntimeError {
    RuntimeError::IndexOutOfBounds
}

#[cold]
pub fn key_not_found() -> RuntimeError {
    RuntimeError::KeyNotFound
}

#[cold]
pub fn field_out_of_range(index: u64, count: usize) -> RuntimeError {
    RuntimeError::FieldOutOfRange { index, count }
}

#[cold]
pub fn empty_input(function: &'static str) -> RuntimeError {
    RuntimeError::EmptyInput { function }
}

#[cold]
pub fn conversion_failed(value: impl Into<String>, target: &'static str) -> RuntimeError {
    RuntimeError::Conversion {
        value: value.into(),
        target,
    }
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> RuntimeError {
    RuntimeError::Overflow(operation)
}

#[cold]
pub fn division_by_zero() -> RuntimeError {
    RuntimeError::DivisionByZero
}

#[cold]
pub fn negative_exponent() -> RuntimeError {
    RuntimeError::NegativeExponent
}

#[cold]
pub fn condition_false() -> RuntimeError {
    RuntimeError::ConditionFalse
}

#[cold]
pub fn already_iterating() -> RuntimeError {
    RuntimeError::AlreadyIterating
}

#[cold]
pub fn not_implemented(capability: &'static str) -> RuntimeError {
    RuntimeError::NotImplemented(capability)
}

/// Broken executor invariant, such as an operand stack underflow.
#[cold]
pub fn corrupt_state(what: &'static str) -> RuntimeError {
    RuntimeError::Corrupt(what)
}

#[cold]
pub fn input_failed(err: &std::io::Error) -> RuntimeError {
    RuntimeError::Input(err.to_string())
}

#[cold]
pub fn worker_failed(worker: usize, message: impl Into<String>) -> RuntimeError {
    RuntimeError::Worker {
        worker,
        message: message.into(),
    }
}
