//! Literal scalars.

use std::fmt;
use std::sync::Arc;

use crate::AtomType;

/// A literal operand of a `Val` instruction.
///
/// Reals compare by bit pattern so instruction lists can be compared
/// structurally (inference idempotence relies on it).
#[derive(Clone, Debug)]
pub enum Atom {
    Int(i64),
    UInt(u64),
    Real(f64),
    Str(Arc<str>),
}

impl Atom {
    pub fn ty(&self) -> AtomType {
        match self {
            Atom::Int(_) => AtomType::Int,
            Atom::UInt(_) => AtomType::UInt,
            Atom::Real(_) => AtomType::Real,
            Atom::Str(_) => AtomType::String,
        }
    }

    pub fn string(s: &str) -> Self {
        Atom::Str(Arc::from(s))
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Atom::Int(a), Atom::Int(b)) => a == b,
            (Atom::UInt(a), Atom::UInt(b)) => a == b,
            (Atom::Real(a), Atom::Real(b)) => a.to_bits() == b.to_bits(),
            (Atom::Str(a), Atom::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Atom {}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Int(v) => write!(f, "{v}"),
            Atom::UInt(v) => write!(f, "{v}u"),
            Atom::Real(v) => write!(f, "{v:?}"),
            Atom::Str(s) => write!(f, "{s:?}"),
        }
    }
}
