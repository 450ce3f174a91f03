//! Lazy sequences.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use sift_diagnostic::already_iterating;

use crate::{EvalResult, Heap, MapValue, NativeFn, Value};

/// A source of values, pulled one at a time.
pub trait Iterate: Send {
    /// The next value, or `None` once exhausted. Exhausted sources stay
    /// exhausted.
    fn next(&mut self) -> EvalResult<Option<Value>>;
}

/// Shared handle to one iteration state.
///
/// Clones share the cursor: pulling from one advances all of them. Pulling
/// from a sequence while it is already producing a value (for instance from
/// inside its own generator body) fails instead of deadlocking.
#[derive(Clone)]
pub struct Sequence(Arc<Mutex<Box<dyn Iterate>>>);

impl Sequence {
    pub fn new(source: impl Iterate + 'static) -> Self {
        Sequence(Arc::new(Mutex::new(Box::new(source))))
    }

    pub fn empty() -> Self {
        Sequence::new(Empty)
    }

    /// A sequence over `value`: arrays yield their elements, maps yield
    /// `(key, value)` pairs, sequences are returned as is, and anything else
    /// yields itself once.
    pub fn wrap(value: Value) -> Self {
        match value {
            Value::Seq(seq) => seq,
            Value::Array(array) => Sequence::new(ArrayCursor { array, pos: 0 }),
            Value::Map(map) => Sequence::new(MapCursor {
                map,
                entries: None,
            }),
            Value::Reduce(r) => Sequence::wrap(r.into_inner().into_value()),
            other => Sequence::new(Once(Some(other))),
        }
    }

    pub fn next(&self) -> EvalResult<Option<Value>> {
        match self.0.try_lock() {
            Some(mut source) => source.next(),
            None => Err(already_iterating()),
        }
    }

    /// Drain the remaining values.
    pub fn collect(&self) -> EvalResult<Vec<Value>> {
        let mut out = Vec::new();
        while let Some(v) = self.next()? {
            out.push(v);
        }
        Ok(out)
    }

    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence({:#x})", self.addr())
    }
}

struct Empty;

impl Iterate for Empty {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        Ok(None)
    }
}

struct Once(Option<Value>);

impl Iterate for Once {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        Ok(self.0.take())
    }
}

struct ArrayCursor {
    array: Heap<crate::Array>,
    pos: usize,
}

impl Iterate for ArrayCursor {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        let item = self.array.get(self.pos);
        if item.is_some() {
            self.pos += 1;
        }
        Ok(item)
    }
}

/// Map entries are snapshotted on the first pull.
struct MapCursor {
    map: Heap<MapValue>,
    entries: Option<std::vec::IntoIter<(Value, Value)>>,
}

impl Iterate for MapCursor {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        let map = &self.map;
        let entries = self.entries.get_or_insert_with(|| map.entries().into_iter());
        Ok(entries.next().map(|(k, v)| Value::tuple(vec![k, v])))
    }
}

/// Applies a native element-wise to an upstream sequence.
///
/// When `rest` is present each element is passed as the first field of a
/// tuple followed by the `rest` values; otherwise the element is passed
/// directly. Every call starts from a fresh copy of `holder`.
pub struct LiftSeq {
    upstream: Sequence,
    rest: Option<Vec<Value>>,
    native: NativeFn,
    holder: Value,
}

impl LiftSeq {
    pub fn new(upstream: Sequence, rest: Option<Vec<Value>>, native: NativeFn, holder: Value) -> Self {
        LiftSeq {
            upstream,
            rest,
            native,
            holder,
        }
    }
}

impl Iterate for LiftSeq {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        let Some(elem) = self.upstream.next()? else {
            return Ok(None);
        };
        let arg = match &self.rest {
            None => elem,
            Some(rest) => {
                let mut items = Vec::with_capacity(rest.len() + 1);
                items.push(elem);
                items.extend(rest.iter().cloned());
                Value::tuple(items)
            }
        };
        let mut out = self.holder.clone();
        (self.native)(&arg, &mut out)?;
        Ok(Some(out))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
