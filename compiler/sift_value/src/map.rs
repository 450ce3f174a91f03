//! Map values.

use std::cmp::Ordering;
use std::collections::{btree_map, hash_map, BTreeMap};
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use sift_diagnostic::not_implemented;

use crate::{EvalResult, Sequence, Value};

/// Which storage new maps use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MapMode {
    /// Hashed storage; iteration order is unspecified.
    #[default]
    Hashed,
    /// Key-ordered storage.
    Ordered,
}

#[derive(Clone, Debug)]
pub enum MapValue {
    Ordered(BTreeMap<Value, Value>),
    Hashed(FxHashMap<Value, Value>),
}

impl MapValue {
    pub fn new(mode: MapMode) -> Self {
        match mode {
            MapMode::Hashed => MapValue::Hashed(FxHashMap::default()),
            MapMode::Ordered => MapValue::Ordered(BTreeMap::new()),
        }
    }

    pub fn mode(&self) -> MapMode {
        match self {
            MapValue::Ordered(_) => MapMode::Ordered,
            MapValue::Hashed(_) => MapMode::Hashed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MapValue::Ordered(m) => m.len(),
            MapValue::Hashed(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            MapValue::Ordered(m) => m.get(key),
            MapValue::Hashed(m) => m.get(key),
        }
    }

    pub fn clear(&mut self) {
        match self {
            MapValue::Ordered(m) => m.clear(),
            MapValue::Hashed(m) => m.clear(),
        }
    }

    /// Insert, merging into the existing value when the key is present.
    pub fn merge_insert(&mut self, mut key: Value, value: Value) -> EvalResult<()> {
        key.merge_end();
        match self {
            MapValue::Ordered(m) => match m.entry(key) {
                btree_map::Entry::Occupied(mut e) => e.get_mut().merge(value)?,
                btree_map::Entry::Vacant(e) => {
                    e.insert(value);
                }
            },
            MapValue::Hashed(m) => match m.entry(key) {
                hash_map::Entry::Occupied(mut e) => e.get_mut().merge(value)?,
                hash_map::Entry::Vacant(e) => {
                    e.insert(value);
                }
            },
        }
        Ok(())
    }

    /// Settle every value after the last merge.
    pub fn finish(&mut self) {
        match self {
            MapValue::Ordered(m) => m.values_mut().for_each(Value::merge_end),
            MapValue::Hashed(m) => m.values_mut().for_each(Value::merge_end),
        }
    }

    /// Replace the contents with the `(key, value)` pairs `seq` yields.
    pub fn fill(&mut self, seq: &Sequence) -> EvalResult<()> {
        self.clear();
        while let Some(pair) = seq.next()? {
            match pair.as_tuple() {
                Some([k, v]) => self.merge_insert(k.clone(), v.clone())?,
                _ => return Err(not_implemented("map fill from non-pair")),
            }
        }
        self.finish();
        Ok(())
    }

    /// Entries in iteration order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = (&Value, &Value)> + '_> {
        match self {
            MapValue::Ordered(m) => Box::new(m.iter()),
            MapValue::Hashed(m) => Box::new(m.iter()),
        }
    }

    fn sorted_entries(&self) -> Vec<(&Value, &Value)> {
        match self {
            MapValue::Ordered(m) => m.iter().collect(),
            MapValue::Hashed(m) => {
                let mut entries: Vec<_> = m.iter().collect();
                entries.sort_unstable();
                entries
            }
        }
    }

    pub(crate) fn cmp_entries(&self, other: &MapValue) -> Ordering {
        self.sorted_entries().cmp(&other.sorted_entries())
    }

    /// Order-independent hash of all entries.
    pub(crate) fn hash_entries<H: Hasher>(&self, state: &mut H) {
        let combined = self.iter().fold(0u64, |acc, (k, v)| {
            let mut h = FxHasher::default();
            k.hash(&mut h);
            v.hash(&mut h);
            acc.wrapping_add(h.finish())
        });
        self.len().hash(state);
        combined.hash(state);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
