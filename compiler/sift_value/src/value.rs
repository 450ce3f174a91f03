//! The tagged runtime value.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use sift_ir::{Atom, AtomType, Type};

use crate::{Array, EvalResult, Heap, MapMode, MapValue, Reducer, Sequence};

/// A runtime value.
///
/// `Reduce` values behave like the value they currently hold everywhere
/// except [`Value::merge`], where they accumulate instead of being replaced.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Real(f64),
    Str(Heap<str>),
    Tuple(Heap<Vec<Value>>),
    Array(Heap<Array>),
    Map(Heap<MapValue>),
    Seq(Sequence),
    Reduce(Heap<Reducer>),
}

// Factory methods

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(Heap::from_arc(Arc::from(s)))
    }

    pub fn owned_string(s: String) -> Self {
        Value::Str(Heap::from_arc(Arc::from(s)))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    /// The empty tuple, passed to zero-argument calls.
    pub fn unit() -> Self {
        Value::tuple(Vec::new())
    }

    pub fn array(array: Array) -> Self {
        Value::Array(Heap::new(array))
    }

    pub fn map(map: MapValue) -> Self {
        Value::Map(Heap::new(map))
    }

    pub fn seq(seq: Sequence) -> Self {
        Value::Seq(seq)
    }

    pub fn reducer(reducer: Reducer) -> Self {
        Value::Reduce(Heap::new(reducer))
    }

    pub fn from_atom(atom: &Atom) -> Self {
        match atom {
            Atom::Int(v) => Value::Int(*v),
            Atom::UInt(v) => Value::UInt(*v),
            Atom::Real(v) => Value::Real(*v),
            Atom::Str(s) => Value::Str(Heap::from_arc(Arc::clone(s))),
        }
    }

    /// Type-directed empty holder.
    pub fn default_for(ty: &Type, mode: MapMode) -> Self {
        match ty {
            Type::None => Value::unit(),
            Type::Atom(AtomType::Int) => Value::Int(0),
            Type::Atom(AtomType::UInt) => Value::UInt(0),
            Type::Atom(AtomType::Real) => Value::Real(0.0),
            Type::Atom(AtomType::String) => Value::string(""),
            Type::Tuple(ts) => Value::tuple(ts.iter().map(|t| Value::default_for(t, mode)).collect()),
            Type::Array(elem) => Value::array(Array::for_element(elem)),
            Type::Map(..) => Value::map(MapValue::new(mode)),
            Type::Seq(_) => Value::seq(Sequence::empty()),
        }
    }
}

// Accessors. All of them see through reducers.

impl Value {
    /// The value with any top-level reducer replaced by its current result.
    pub fn plain(&self) -> Cow<'_, Value> {
        match self {
            Value::Reduce(r) => Cow::Owned(r.value().clone()),
            other => Cow::Borrowed(other),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Reduce(r) => r.value().as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Reduce(r) => r.value().as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Reduce(r) => r.value().as_f64(),
            _ => None,
        }
    }

    /// Any numeric scalar widened to `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            Value::Reduce(r) => r.value().to_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Reduce(r) => r.value().as_str(),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            Value::Reduce(r) => r.value().as_tuple(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            Value::Reduce(r) => r.value().as_array(),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&Sequence> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::UInt(_) => "UInt",
            Value::Real(_) => "Real",
            Value::Str(_) => "String",
            Value::Tuple(_) => "Tuple",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Seq(_) => "Seq",
            Value::Reduce(r) => r.value().kind_name(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::UInt(_) => 1,
            Value::Real(_) => 2,
            Value::Str(_) => 3,
            Value::Tuple(_) => 4,
            Value::Array(_) => 5,
            Value::Map(_) => 6,
            Value::Seq(_) => 7,
            Value::Reduce(r) => r.value().rank(),
        }
    }
}

// Merging

impl Value {
    /// Combine `other` into `self` for a duplicate map key.
    ///
    /// Reducers accumulate, tuples merge field by field, anything else is
    /// replaced by the newer value.
    pub fn merge(&mut self, other: Value) -> EvalResult<()> {
        match (self, other) {
            (Value::Reduce(acc), Value::Reduce(next)) => acc.make_mut().merge(&next),
            (Value::Tuple(acc), Value::Tuple(next)) if acc.len() == next.len() => {
                for (slot, v) in acc.make_mut().iter_mut().zip(next.iter()) {
                    slot.merge(v.clone())?;
                }
                Ok(())
            }
            (slot, other) => {
                *slot = other;
                Ok(())
            }
        }
    }

    /// Finalize reducers, leaving plain values behind.
    pub fn merge_end(&mut self) {
        match self {
            Value::Reduce(r) => {
                let mut reducer = r.clone().into_inner();
                reducer.finish();
                *self = reducer.into_value();
            }
            Value::Tuple(items) if items.iter().any(Value::has_reducer) => {
                for v in items.make_mut() {
                    v.merge_end();
                }
            }
            _ => {}
        }
    }

    fn has_reducer(&self) -> bool {
        match self {
            Value::Reduce(_) => true,
            Value::Tuple(items) => items.iter().any(Value::has_reducer),
            _ => false,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Reduce(a), _) => a.value().cmp(other),
            (_, Value::Reduce(b)) => self.cmp(b.value()),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::UInt(a), Value::UInt(b)) => a.cmp(b),
            (Value::Real(a), Value::Real(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => (**a).cmp(&**b),
            (Value::Tuple(a), Value::Tuple(b)) => a.iter().cmp(b.iter()),
            (Value::Array(a), Value::Array(b)) => a.cmp_elements(b),
            (Value::Map(a), Value::Map(b)) => a.cmp_entries(b),
            (Value::Seq(a), Value::Seq(b)) => a.addr().cmp(&b.addr()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Value::Reduce(r) = self {
            r.value().hash(state);
            return;
        }
        self.rank().hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::UInt(v) => v.hash(state),
            Value::Real(v) => v.to_bits().hash(state),
            Value::Str(s) => (**s).hash(state),
            Value::Tuple(items) => items.iter().for_each(|v| v.hash(state)),
            Value::Array(a) => {
                a.len().hash(state);
                a.iter().for_each(|v| v.hash(state));
            }
            Value::Map(m) => m.hash_entries(state),
            Value::Seq(s) => s.addr().hash(state),
            Value::Reduce(_) => {}
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
