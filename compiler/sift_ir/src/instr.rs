//! Stack bytecode.
//!
//! A program is a [`Block`]: a flat list of [`Instruction`]s run left to
//! right over an operand stack. Lambda-like sub-programs (generator bodies
//! and sources, call arguments, index expressions) are nested blocks owned by
//! the instruction that uses them. Every nested block ends with a `Tup` that
//! collapses to nothing when it holds a single value.
//!
//! # Stack effects
//!
//! | Op | Pops | Pushes |
//! |----|------|--------|
//! | `Val` | 0 | literal |
//! | `Var` / `Vaw` | 0 / 1 | slot value / nothing |
//! | arithmetic, `Eq`, `Lt` | 2 | 1 |
//! | `Not`, `BitNot`, `I2R1`, `U2R1`, `Seq`, `Arr`, `Map` | 1 | 1 |
//! | `I2R2`, `U2R2`, `Rot` | 2 | 2 |
//! | `Tup` | arity | 1 |
//! | `Gen`, `GenTry` | 1 (source) | 1 (sequence) |
//! | `Rec` | 1 (`(init, sequence)`) | 1 |
//! | `Call` / `Index` | 1 | 1 |
//! | `Call0` | 0 | 1 |
//!
//! `Def` only exists before inference, which records the definition and
//! erases the instruction.

use std::fmt;

use crate::{Atom, Name, Type};

/// An owned instruction list.
pub type Block = Vec<Instruction>;

/// Index into a compiled program's call table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallId(u32);

impl CallId {
    pub fn new(index: usize) -> Self {
        CallId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opcodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Push a literal.
    Val,
    /// Read a variable.
    Var,
    /// Write a variable.
    Vaw,
    /// Generator: closures `[body, source]` before inference, `[body]` after.
    Gen,
    /// Generator that skips elements whose body fails at runtime.
    GenTry,
    /// Fold over a sequence: closures `[body, source]` before inference,
    /// `[body]` after. The body sees `@` as `(accumulator, element)`.
    Rec,
    /// Named definition, inlined at every call: closure `[body]`.
    Def,
    /// Drain a sequence into an array.
    Arr,
    /// Drain a sequence of pairs into a map.
    Map,
    /// Build a tuple from the values above an offset.
    Tup,
    /// Wrap a value lazily into a sequence.
    Seq,
    /// Call with one argument.
    Call,
    /// Call without arguments.
    Call0,
    /// Container indexing.
    Index,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    And,
    Or,
    Xor,
    BitNot,
    /// Logical not on integers.
    Not,
    Eq,
    Lt,
    /// Swap the two topmost values.
    Rot,
    /// Int to Real, top of stack.
    I2R1,
    /// UInt to Real, top of stack.
    U2R1,
    /// Int to Real, second from top.
    I2R2,
    /// UInt to Real, second from top.
    U2R2,
}

impl Op {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Val => "VAL",
            Op::Var => "VAR",
            Op::Vaw => "VAW",
            Op::Gen => "GEN",
            Op::GenTry => "GEN_TRY",
            Op::Rec => "REC",
            Op::Def => "DEF",
            Op::Arr => "ARR",
            Op::Map => "MAP",
            Op::Tup => "TUP",
            Op::Seq => "SEQ",
            Op::Call => "FUN",
            Op::Call0 => "FUN0",
            Op::Index => "IDX",
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::Mod => "MOD",
            Op::Pow => "EXP",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Xor => "XOR",
            Op::BitNot => "BNOT",
            Op::Not => "NOT",
            Op::Eq => "EQ",
            Op::Lt => "LT",
            Op::Rot => "ROT",
            Op::I2R1 => "I2R_1",
            Op::U2R1 => "U2R_1",
            Op::I2R2 => "I2R_2",
            Op::U2R2 => "U2R_2",
        }
    }

    /// Binary operators that go through numeric promotion.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Pow)
    }

    /// Binary operators restricted to integers.
    pub fn is_integer_only(self) -> bool {
        matches!(self, Op::Mod | Op::And | Op::Or | Op::Xor)
    }

    /// Source-level spelling of an operator, for error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Pow => "**",
            Op::And => "&",
            Op::Or => "|",
            Op::Xor => "^",
            Op::BitNot => "~",
            Op::Not => "!",
            Op::Eq => "==",
            Op::Lt => "<",
            other => other.mnemonic(),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Instruction operand.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Operand {
    #[default]
    None,
    /// Literal of a `Val`.
    Atom(Atom),
    /// Unresolved variable or function name.
    Name(Name),
    /// Variable resolved to a flat slot.
    Slot { name: Name, slot: u32 },
    /// `Tup` offset; `arity` is filled in by inference.
    Tuple { offset: u32, arity: u32 },
}

/// One bytecode instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub arg: Operand,
    pub closures: Vec<Block>,
    /// Resolved type; `None` until inference.
    pub ty: Option<Type>,
    /// Resolved native function for `Call`, `Call0` and `Index`.
    pub call: Option<CallId>,
}

impl Instruction {
    pub fn new(op: Op) -> Self {
        Instruction {
            op,
            arg: Operand::None,
            closures: Vec::new(),
            ty: None,
            call: None,
        }
    }

    pub fn with_arg(op: Op, arg: Operand) -> Self {
        Instruction {
            arg,
            ..Instruction::new(op)
        }
    }

    pub fn literal(atom: Atom) -> Self {
        Instruction::with_arg(Op::Val, Operand::Atom(atom))
    }

    pub fn named(op: Op, name: Name) -> Self {
        Instruction::with_arg(op, Operand::Name(name))
    }

    pub fn tuple(offset: u32) -> Self {
        Instruction::with_arg(Op::Tup, Operand::Tuple { offset, arity: 0 })
    }

    /// Variable or function name, resolved or not.
    pub fn name(&self) -> Option<Name> {
        match self.arg {
            Operand::Name(n) | Operand::Slot { name: n, .. } => Some(n),
            _ => None,
        }
    }

    /// Resolved slot of a `Var`, `Vaw`, `Gen`, `GenTry` or `Rec`.
    pub fn slot(&self) -> Option<u32> {
        match self.arg {
            Operand::Slot { slot, .. } => Some(slot),
            _ => None,
        }
    }

    pub fn atom(&self) -> Option<&Atom> {
        match &self.arg {
            Operand::Atom(a) => Some(a),
            _ => None,
        }
    }
}
