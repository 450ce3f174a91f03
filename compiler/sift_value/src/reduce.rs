//! Reducers: values that accumulate when merged under a duplicate map key.

use rustc_hash::FxHashSet;
use sift_diagnostic::{integer_overflow, not_implemented};

use crate::{Array, EvalResult, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReduceKind {
    Sum,
    Min,
    Max,
    Avg,
    /// Population variance.
    Var,
    Stdev,
    Sort,
    /// Number of distinct values.
    Uniques,
}

impl ReduceKind {
    pub fn name(self) -> &'static str {
        match self {
            ReduceKind::Sum => "sum",
            ReduceKind::Min => "min",
            ReduceKind::Max => "max",
            ReduceKind::Avg => "avg",
            ReduceKind::Var => "var",
            ReduceKind::Stdev => "stdev",
            ReduceKind::Sort => "sort",
            ReduceKind::Uniques => "uniques",
        }
    }
}

/// Running state of one reduction.
///
/// `value` always holds the current result, so a reducer can be read at any
/// point. Averages keep a running total; variances keep the count, mean and
/// sum of squared deviations and combine partial states exactly. Unique
/// counts keep every distinct value seen.
#[derive(Clone, Debug)]
pub struct Reducer {
    kind: ReduceKind,
    value: Value,
    count: u64,
    mean: f64,
    m2: f64,
    seen: FxHashSet<Value>,
}

impl Reducer {
    /// Reducer holding a single observation.
    ///
    /// For [`ReduceKind::Sort`] the seed is the element; it is kept as a
    /// one-element array.
    pub fn new(kind: ReduceKind, seed: Value) -> Self {
        let x = seed.to_f64().unwrap_or(0.0);
        let mut reducer = Reducer {
            kind,
            value: Value::unit(),
            count: 1,
            mean: x,
            m2: 0.0,
            seen: FxHashSet::default(),
        };
        reducer.value = match kind {
            ReduceKind::Sum | ReduceKind::Min | ReduceKind::Max => seed,
            ReduceKind::Avg => Value::Real(x),
            ReduceKind::Var | ReduceKind::Stdev => Value::Real(0.0),
            ReduceKind::Sort => Value::array(Array::from_values(vec![seed])),
            ReduceKind::Uniques => {
                reducer.seen.insert(seed);
                Value::UInt(1)
            }
        };
        reducer
    }

    pub fn kind(&self) -> ReduceKind {
        self.kind
    }

    /// Current result.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn merge(&mut self, other: &Reducer) -> EvalResult<()> {
        match self.kind {
            ReduceKind::Sum => self.value = add(&self.value, &other.value)?,
            ReduceKind::Min => {
                if other.value < self.value {
                    self.value = other.value.clone();
                }
            }
            ReduceKind::Max => {
                if other.value > self.value {
                    self.value = other.value.clone();
                }
            }
            ReduceKind::Avg => {
                let n = (self.count + other.count) as f64;
                self.mean = (self.mean * self.count as f64 + other.mean * other.count as f64) / n;
                self.count += other.count;
                self.value = Value::Real(self.mean);
            }
            ReduceKind::Var | ReduceKind::Stdev => {
                let (na, nb) = (self.count as f64, other.count as f64);
                let n = na + nb;
                let delta = other.mean - self.mean;
                self.mean += delta * nb / n;
                self.m2 += other.m2 + delta * delta * na * nb / n;
                self.count += other.count;
                self.value = Value::Real(self.spread());
            }
            ReduceKind::Sort => match (&mut self.value, &other.value) {
                (Value::Array(acc), Value::Array(more)) => acc.make_mut().extend(more),
                _ => return Err(not_implemented("sort merge")),
            },
            ReduceKind::Uniques => {
                self.seen.extend(other.seen.iter().cloned());
                self.value = Value::UInt(self.seen.len() as u64);
            }
        }
        Ok(())
    }

    /// Final step after the last merge.
    pub fn finish(&mut self) {
        if let (ReduceKind::Sort, Value::Array(items)) = (self.kind, &mut self.value) {
            items.make_mut().sort();
        }
    }

    fn spread(&self) -> f64 {
        let var = self.m2 / self.count as f64;
        match self.kind {
            ReduceKind::Stdev => var.sqrt(),
            _ => var,
        }
    }
}

fn add(a: &Value, b: &Value) -> EvalResult<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_add(*y)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("sum")),
        (Value::UInt(x), Value::UInt(y)) => x
            .checked_add(*y)
            .map(Value::UInt)
            .ok_or_else(|| integer_overflow("sum")),
        (Value::Real(x), Value::Real(y)) => Ok(Value::Real(x + y)),
        _ => Err(not_implemented("sum merge")),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
