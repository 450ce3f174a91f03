//! Execution of typed sift programs.
//!
//! [`Executor`] turns a [`sift_types::Program`] into allocated steps and runs
//! them; [`default_registry`] provides the builtin functions those programs
//! resolve against. Operator semantics (wrapping checks, promotion results)
//! live in `operators`.

mod builtins;
mod exec;
mod operators;

pub use builtins::default_registry;
pub use exec::Executor;
