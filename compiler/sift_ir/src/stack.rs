//! Stack growth for deeply nested programs.
//!
//! The parser, inferencer and optimizer recurse once per nesting level of
//! the source. Wrapping each recursive step keeps pathological inputs such as
//! `((((...))))` from overflowing the native stack.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if it is close to exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
