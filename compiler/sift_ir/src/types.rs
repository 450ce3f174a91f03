//! The structural type language.
//!
//! Types are plain trees compared structurally. `Seq` is the only type whose
//! values are not storable; [`Type::contains_seq`] is what the inferencer uses
//! to keep sequences out of arrays, maps and materialized tuples.

use std::fmt;

/// Scalar kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomType {
    Int,
    UInt,
    Real,
    String,
}

impl AtomType {
    pub fn name(self) -> &'static str {
        match self {
            AtomType::Int => "Int",
            AtomType::UInt => "UInt",
            AtomType::Real => "Real",
            AtomType::String => "String",
        }
    }
}

/// A sift type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Type {
    /// No value (empty argument lists, assignments).
    #[default]
    None,
    Atom(AtomType),
    Tuple(Vec<Type>),
    Array(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Seq(Box<Type>),
}

impl Type {
    #[inline]
    pub fn int() -> Self {
        Type::Atom(AtomType::Int)
    }

    #[inline]
    pub fn uint() -> Self {
        Type::Atom(AtomType::UInt)
    }

    #[inline]
    pub fn real() -> Self {
        Type::Atom(AtomType::Real)
    }

    #[inline]
    pub fn string() -> Self {
        Type::Atom(AtomType::String)
    }

    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn seq(elem: Type) -> Self {
        Type::Seq(Box::new(elem))
    }

    pub fn tuple(elems: Vec<Type>) -> Self {
        Type::Tuple(elems)
    }

    /// The scalar kind, if this is an atom.
    pub fn atom(&self) -> Option<AtomType> {
        match self {
            Type::Atom(a) => Some(*a),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Type::None)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Atom(AtomType::Int | AtomType::UInt))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Atom(AtomType::Int | AtomType::UInt | AtomType::Real)
        )
    }

    pub fn is_uint(&self) -> bool {
        matches!(self, Type::Atom(AtomType::UInt))
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Type::Atom(AtomType::Real))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Atom(AtomType::String))
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Type::Seq(_))
    }

    /// Element type of a sequence.
    pub fn seq_element(&self) -> Option<&Type> {
        match self {
            Type::Seq(t) => Some(t),
            _ => None,
        }
    }

    /// True if a `Seq` occurs anywhere in this type, including at the root.
    pub fn contains_seq(&self) -> bool {
        match self {
            Type::Seq(_) => true,
            Type::Tuple(ts) => ts.iter().any(Type::contains_seq),
            Type::Array(t) => t.contains_seq(),
            Type::Map(k, v) => k.contains_seq() || v.contains_seq(),
            Type::None | Type::Atom(_) => false,
        }
    }

    /// The sequence type produced by lazily wrapping a value of this type.
    ///
    /// Returns `None` when the type is already a sequence.
    pub fn wrapped_seq(&self) -> Option<Type> {
        match self {
            Type::Seq(_) => None,
            Type::Array(t) => Some(Type::Seq(t.clone())),
            Type::Map(k, v) => Some(Type::seq(Type::Tuple(vec![
                k.as_ref().clone(),
                v.as_ref().clone(),
            ]))),
            other => Some(Type::seq(other.clone())),
        }
    }

    /// Like [`Type::wrapped_seq`] but returns sequences unchanged.
    pub fn as_seq(&self) -> Type {
        self.wrapped_seq().unwrap_or_else(|| self.clone())
    }
}

impl From<AtomType> for Type {
    fn from(a: AtomType) -> Self {
        Type::Atom(a)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::None => f.write_str("None"),
            Type::Atom(a) => f.write_str(a.name()),
            Type::Tuple(ts) => {
                f.write_str("(")?;
                for (i, t) in ts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{t}")?;
                }
                f.write_str(")")
            }
            Type::Array(t) => write!(f, "Arr[{t}]"),
            Type::Map(k, v) => write!(f, "Map[{k}, {v}]"),
            Type::Seq(t) => write!(f, "Seq[{t}]"),
        }
    }
}
