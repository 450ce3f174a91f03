//! Sift IR - types and bytecode for the sift compiler.
//!
//! This crate contains the data structures shared by every compiler stage:
//! - [`Type`]: the closed structural type language
//! - [`Atom`]: literal scalars carried by `Val` instructions
//! - [`Instruction`] / [`Block`]: the stack bytecode with nested closures
//! - [`Name`] / [`StringInterner`]: interned identifiers owned by a session
//! - [`dump_block`]: the `-vv`/`-vvv` program printer
//!
//! # Design
//!
//! Instructions are created untyped by the parser, then mutated in place by
//! the inferencer (types, slots, call handles). After inference they are
//! immutable. Resolved native functions are not stored on instructions; a
//! [`CallId`] indexes the compiled program's call table instead, which keeps
//! this crate free of runtime value types.

mod atom;
mod instr;
mod interner;
mod printer;
mod stack;
mod types;

pub use atom::Atom;
pub use instr::{Block, CallId, Instruction, Op, Operand};
pub use interner::{Name, StringInterner};
pub use printer::dump_block;
pub use stack::ensure_sufficient_stack;
pub use types::{AtomType, Type};
