//! Sift values - the runtime object model.
//!
//! # Ownership
//!
//! Containers (tuples, arrays, maps) own their children through [`Heap`], an
//! `Arc` wrapper with copy-on-write mutation, so cloning a value is cheap and
//! behaves like a deep copy. Sequences are the exception: a [`Sequence`] is a
//! shared handle to one iteration state and is never stored inside a
//! container.
//!
//! # Capabilities
//!
//! | Capability | Where |
//! |------------|-------|
//! | hash, equals, ordering | `Eq`/`Ord`/`Hash` impls on [`Value`] |
//! | clone | `Clone` (copy-on-write) |
//! | print | [`Value::print`] |
//! | wrap, next | [`Sequence::wrap`], [`Sequence::next`] |
//! | fill | [`Array::fill`], [`MapValue::fill`] |
//! | merge, merge end | [`Value::merge`], [`Value::merge_end`] |

mod array;
mod heap;
pub mod index;
mod map;
mod native;
mod print;
mod reduce;
mod seq;
mod value;

pub use array::Array;
pub use heap::Heap;
pub use map::{MapMode, MapValue};
pub use native::{native, NativeFn};
pub use print::format_real;
pub use reduce::{ReduceKind, Reducer};
pub use seq::{Iterate, LiftSeq, Sequence};
pub use value::Value;

pub use sift_diagnostic::RuntimeError;

/// Result of any runtime operation.
pub type EvalResult<T = Value> = Result<T, RuntimeError>;
