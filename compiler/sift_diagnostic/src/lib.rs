//! Sift diagnostics - the error taxonomy shared by every stage.
//!
//! # Taxonomy
//!
//! | Layer | Type | When |
//! |-------|------|------|
//! | parser | [`ParseError`] | malformed syntax, bad literals |
//! | inferencer | [`TypeError`] | bad operands, undefined variables, invalid indexing, stored sequences, misused definitions |
//! | inferencer | [`ResolutionError`] | no registry entry matches a call |
//! | executor, builtins | [`RuntimeError`] | bounds, missing keys, empty reductions, conversions |
//! | any | [`EngineError`] | broken internal invariants |
//!
//! All of them are fatal. [`Error`] unifies them for the driver.

mod render;
mod runtime;

use sift_ir::Type;
use thiserror::Error;

pub use render::render_parse_error;
pub use runtime::{
    already_iterating, condition_false, conversion_failed, corrupt_state, division_by_zero, empty_input, field_out_of_range,
    index_out_of_bounds, input_failed, integer_overflow, key_not_found, negative_exponent,
    not_implemented, worker_failed, RuntimeError,
};

/// Malformed program text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset of the offending input.
    pub offset: usize,
    /// Length in bytes of the offending input (at least 1 for rendering).
    pub len: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize, len: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
            len,
        }
    }

    /// Unparsed trailing input starting at `offset`.
    pub fn unparsed(source: &str, offset: usize) -> Self {
        let rest = source.get(offset..).unwrap_or_default();
        ParseError::new(
            format!("Syntax error, unparsed input: \"{rest}\""),
            offset,
            rest.len(),
        )
    }
}

/// Ill-typed program.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Use of undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Use of '{op}' operator on non-numeric value of type {found}")]
    NonNumeric { op: &'static str, found: Type },

    #[error("Use of '{op}' operator on non-integer value of type {found}")]
    NonInteger { op: &'static str, found: Type },

    #[error("Only objects of the same type can be compared. Tried comparing {left} and {right}")]
    CompareMismatch { left: Type, right: Type },

    #[error("{context} expects a sequence, found {found}")]
    NotASequence { context: &'static str, found: Type },

    #[error("Sequences cannot be stored: {context} of {found}")]
    StoredSequence { context: &'static str, found: Type },

    #[error("Map construction requires key/value pairs, found {0}")]
    NotAPair(Type),

    #[error("Indexing tuples is only possible with integer literals")]
    TupleIndexNotLiteral,

    #[error("Tuple index {index} out of range for {tuple}")]
    TupleIndexOutOfRange { index: u64, tuple: Type },

    #[error("Cannot index {container} with {index}")]
    BadIndex { container: Type, index: Type },

    #[error("Expression computes nothing")]
    ComputesNothing,

    #[error("Detected recursive function call of {0}")]
    RecursiveDefinition(String),

    #[error("User-defined function '{0}' must be called with arguments.")]
    DefinitionNeedsArguments(String),

    #[error("User-defined function '{0}' must be called without arguments.")]
    DefinitionTakesNoArguments(String),

    #[error("The right-hand side of << ... >> must be a tuple of two elements, with the second element a sequence, found {0}")]
    RecursorSource(Type),

    #[error("Wrong type of left-hand side of << ... >>, expecting {expected}, got {found}")]
    RecursorBody { expected: Type, found: Type },
}

/// A call with no matching registry entry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Invalid function call: {name} {args}")]
pub struct ResolutionError {
    pub name: String,
    pub args: Type,
}

/// Violated engine invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Sanity error: {0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError(message.into())
    }
}

/// Any fatal error.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl Error {
    /// Short name of the error layer, for logging.
    pub fn layer(&self) -> &'static str {
        match self {
            Error::Parse(_) => "parse",
            Error::Type(_) => "type",
            Error::Resolution(_) => "resolution",
            Error::Runtime(_) => "runtime",
            Error::Engine(_) => "engine",
        }
    }
}

/// Result alias used by the driver.
pub type Result<T, E = Error> = std::result::Result<T, E>;
