//! Arrays with specialized storage for atom elements.

use std::cmp::Ordering;

use sift_ir::{AtomType, Type};

use crate::{EvalResult, Heap, Sequence, Value};

/// An array value.
///
/// Atom element types get unboxed storage. Pushing an element that does not
/// fit the current storage moves the array to the generic `Values` form.
#[derive(Clone, Debug)]
pub enum Array {
    Int(Vec<i64>),
    UInt(Vec<u64>),
    Real(Vec<f64>),
    Str(Vec<Heap<str>>),
    Values(Vec<Value>),
}

impl Default for Array {
    fn default() -> Self {
        Array::Values(Vec::new())
    }
}

impl Array {
    /// Empty array with storage chosen for `elem`.
    pub fn for_element(elem: &Type) -> Self {
        match elem.atom() {
            Some(AtomType::Int) => Array::Int(Vec::new()),
            Some(AtomType::UInt) => Array::UInt(Vec::new()),
            Some(AtomType::Real) => Array::Real(Vec::new()),
            Some(AtomType::String) => Array::Str(Vec::new()),
            None => Array::Values(Vec::new()),
        }
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        let mut array = match values.first() {
            Some(Value::Int(_)) => Array::Int(Vec::with_capacity(values.len())),
            Some(Value::UInt(_)) => Array::UInt(Vec::with_capacity(values.len())),
            Some(Value::Real(_)) => Array::Real(Vec::with_capacity(values.len())),
            Some(Value::Str(_)) => Array::Str(Vec::with_capacity(values.len())),
            _ => Array::Values(Vec::with_capacity(values.len())),
        };
        for v in values {
            array.push(v);
        }
        array
    }

    pub fn len(&self) -> usize {
        match self {
            Array::Int(xs) => xs.len(),
            Array::UInt(xs) => xs.len(),
            Array::Real(xs) => xs.len(),
            Array::Str(xs) => xs.len(),
            Array::Values(xs) => xs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Array::Int(xs) => xs.get(index).map(|v| Value::Int(*v)),
            Array::UInt(xs) => xs.get(index).map(|v| Value::UInt(*v)),
            Array::Real(xs) => xs.get(index).map(|v| Value::Real(*v)),
            Array::Str(xs) => xs.get(index).map(|s| Value::Str(s.clone())),
            Array::Values(xs) => xs.get(index).cloned(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub fn clear(&mut self) {
        match self {
            Array::Int(xs) => xs.clear(),
            Array::UInt(xs) => xs.clear(),
            Array::Real(xs) => xs.clear(),
            Array::Str(xs) => xs.clear(),
            Array::Values(xs) => xs.clear(),
        }
    }

    pub fn push(&mut self, value: Value) {
        let value = match value {
            Value::Reduce(r) => r.value().clone(),
            other => other,
        };
        let value = match (&mut *self, value) {
            (Array::Int(xs), Value::Int(v)) => return xs.push(v),
            (Array::UInt(xs), Value::UInt(v)) => return xs.push(v),
            (Array::Real(xs), Value::Real(v)) => return xs.push(v),
            (Array::Str(xs), Value::Str(s)) => return xs.push(s),
            (Array::Values(xs), v) => return xs.push(v),
            (_, v) => v,
        };
        let mut values: Vec<Value> = self.iter().collect();
        values.push(value);
        *self = Array::Values(values);
    }

    pub fn extend(&mut self, other: &Array) {
        match (&mut *self, other) {
            (Array::Int(xs), Array::Int(ys)) => return xs.extend_from_slice(ys),
            (Array::UInt(xs), Array::UInt(ys)) => return xs.extend_from_slice(ys),
            (Array::Real(xs), Array::Real(ys)) => return xs.extend_from_slice(ys),
            (Array::Str(xs), Array::Str(ys)) => return xs.extend(ys.iter().cloned()),
            _ => {}
        }
        for v in other.iter() {
            self.push(v);
        }
    }

    /// Replace the contents with everything `seq` yields.
    pub fn fill(&mut self, seq: &Sequence) -> EvalResult<()> {
        self.clear();
        while let Some(v) = seq.next()? {
            self.push(v);
        }
        Ok(())
    }

    /// Elements `from..=to`. Callers check bounds.
    pub fn slice(&self, from: usize, to: usize) -> Array {
        let range = from..to + 1;
        match self {
            Array::Int(xs) => Array::Int(xs[range].to_vec()),
            Array::UInt(xs) => Array::UInt(xs[range].to_vec()),
            Array::Real(xs) => Array::Real(xs[range].to_vec()),
            Array::Str(xs) => Array::Str(xs[range].to_vec()),
            Array::Values(xs) => Array::Values(xs[range].to_vec()),
        }
    }

    pub fn sort(&mut self) {
        match self {
            Array::Int(xs) => xs.sort_unstable(),
            Array::UInt(xs) => xs.sort_unstable(),
            Array::Real(xs) => xs.sort_unstable_by(f64::total_cmp),
            Array::Str(xs) => xs.sort_unstable_by(|a, b| (**a).cmp(&**b)),
            Array::Values(xs) => xs.sort(),
        }
    }

    pub fn reverse(&mut self) {
        match self {
            Array::Int(xs) => xs.reverse(),
            Array::UInt(xs) => xs.reverse(),
            Array::Real(xs) => xs.reverse(),
            Array::Str(xs) => xs.reverse(),
            Array::Values(xs) => xs.reverse(),
        }
    }

    pub(crate) fn cmp_elements(&self, other: &Array) -> Ordering {
        match (self, other) {
            (Array::Int(xs), Array::Int(ys)) => xs.cmp(ys),
            (Array::UInt(xs), Array::UInt(ys)) => xs.cmp(ys),
            _ => self.iter().cmp(other.iter()),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
