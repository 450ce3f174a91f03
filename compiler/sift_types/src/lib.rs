//! Sift types - function registry and type inference.
//!
//! The inferencer walks the untyped program produced by the parser, runs a
//! compile-time type stack over every block, and rewrites the program in
//! place:
//! - numeric conversions are spliced before mixed arithmetic
//! - variables are resolved to flat slots
//! - call and index argument code is spliced before the instruction, which
//!   receives a handle into the program's call table
//! - generator source code is spliced before the generator
//! - no-op `Tup` and `Seq` instructions are erased
//!
//! Running inference again on its own output yields the same program.

mod infer;
mod registry;
mod scope;

pub use infer::{infer, Program};
pub use registry::{lift, Checker, Registry, Resolution};
pub use scope::{Binding, Scopes};
