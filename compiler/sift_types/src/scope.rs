//! Lexical scopes over a flat slot space.

use rustc_hash::FxHashMap;
use sift_ir::{Block, Name, Type};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub ty: Type,
    pub slot: u32,
}

#[derive(Default)]
struct Frame {
    vars: FxHashMap<Name, Binding>,
    /// Untyped bodies of `def`s, inferred again at every call.
    defs: FxHashMap<Name, Block>,
}

/// Scope stack.
///
/// Slots are handed out in binding order and never reused, so every
/// variable of a program, in any scope, has its own slot. Rebinding a name
/// in the scope that already holds it keeps the slot and updates the type.
pub struct Scopes {
    frames: Vec<Frame>,
    next_slot: u32,
}

impl Scopes {
    pub fn new() -> Self {
        Scopes {
            frames: vec![Frame::default()],
            next_slot: 0,
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind `name` in the innermost scope and return its slot.
    pub fn bind(&mut self, name: Name, ty: Type) -> u32 {
        let next = &mut self.next_slot;
        let Some(frame) = self.frames.last_mut() else {
            return *next;
        };
        let binding = frame.vars.entry(name).or_insert_with(|| {
            let slot = *next;
            *next += 1;
            Binding {
                ty: Type::None,
                slot,
            }
        });
        binding.ty = ty;
        binding.slot
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: Name) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.vars.get(&name))
    }

    /// Define `name` in the innermost scope, replacing an earlier definition
    /// there.
    pub fn define(&mut self, name: Name, body: Block) {
        if let Some(frame) = self.frames.last_mut() {
            frame.defs.insert(name, body);
        }
    }

    /// Innermost definition of `name`.
    pub fn definition(&self, name: Name) -> Option<&Block> {
        self.frames.iter().rev().find_map(|frame| frame.defs.get(&name))
    }

    /// Number of slots handed out so far.
    pub fn slot_count(&self) -> u32 {
        self.next_slot
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
