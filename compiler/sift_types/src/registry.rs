//! Function registry.
//!
//! Functions are registered either for one exact argument type or through a
//! checker that inspects the argument type and returns a [`Resolution`] when
//! it accepts it. Lookup tries exact entries first, then checkers in
//! registration order; the first match wins.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use sift_diagnostic::not_implemented;
use sift_ir::Type;
use sift_value::{native, LiftSeq, MapMode, NativeFn, Sequence, Value};

/// A resolved call: result type, native and optional output prototype.
#[derive(Clone)]
pub struct Resolution {
    pub result: Type,
    pub native: NativeFn,
    /// Holder the native starts from; the executor uses a type-directed
    /// default when absent.
    pub prototype: Option<Value>,
}

impl Resolution {
    pub fn new(result: Type, native: NativeFn) -> Self {
        Resolution {
            result,
            native,
            prototype: None,
        }
    }

    #[must_use]
    pub fn with_prototype(mut self, prototype: Value) -> Self {
        self.prototype = Some(prototype);
        self
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("result", &self.result)
            .field("prototype", &self.prototype)
            .finish_non_exhaustive()
    }
}

/// Polymorphic resolver for one function name.
pub type Checker = Arc<dyn Fn(&Type) -> Option<Resolution> + Send + Sync>;

#[derive(Default)]
struct Overloads {
    exact: Vec<(Type, Resolution)>,
    poly: Vec<Checker>,
}

#[derive(Default)]
pub struct Registry {
    functions: FxHashMap<String, Overloads>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register `name` for exactly `arg`.
    pub fn register(&mut self, name: &str, arg: Type, result: Type, native: NativeFn) {
        self.functions
            .entry(name.to_string())
            .or_default()
            .exact
            .push((arg, Resolution::new(result, native)));
    }

    /// Register a checker for `name`.
    pub fn register_poly<F>(&mut self, name: &str, checker: F)
    where
        F: Fn(&Type) -> Option<Resolution> + Send + Sync + 'static,
    {
        self.functions
            .entry(name.to_string())
            .or_default()
            .poly
            .push(Arc::new(checker));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Exact entries, then checkers in registration order.
    pub fn lookup(&self, name: &str, arg: &Type) -> Option<Resolution> {
        let overloads = self.functions.get(name)?;
        if let Some((_, res)) = overloads.exact.iter().find(|(t, _)| t == arg) {
            return Some(res.clone());
        }
        overloads.poly.iter().find_map(|check| check(arg))
    }

    /// [`Registry::lookup`], falling back to lifting the call over a
    /// sequence argument (or a tuple whose first field is a sequence).
    ///
    /// A sequence of sequences is never lifted: a function that rejects it
    /// stays rejected instead of being applied to every inner sequence.
    pub fn resolve(&self, name: &str, arg: &Type, mode: MapMode) -> Option<Resolution> {
        if let Some(res) = self.lookup(name, arg) {
            return Some(res);
        }
        match arg {
            Type::Seq(elem) if matches!(**elem, Type::Seq(_)) => None,
            Type::Seq(elem) => {
                let inner = self.resolve(name, elem, mode)?;
                tracing::trace!(name, %arg, "lifted over sequence");
                Some(lift(inner, false, mode))
            }
            Type::Tuple(fields) => {
                let (Type::Seq(elem), rest) = fields.split_first()? else {
                    return None;
                };
                if matches!(**elem, Type::Seq(_)) {
                    return None;
                }
                let mut per_element = Vec::with_capacity(fields.len());
                per_element.push((**elem).clone());
                per_element.extend(rest.iter().cloned());
                let inner = self.resolve(name, &Type::tuple(per_element), mode)?;
                tracing::trace!(name, %arg, "lifted over leading sequence");
                Some(lift(inner, true, mode))
            }
            _ => None,
        }
    }
}

/// Apply `inner` lazily to every element of the incoming sequence.
pub fn lift(inner: Resolution, with_rest: bool, mode: MapMode) -> Resolution {
    let Resolution {
        result,
        native: element_native,
        prototype,
    } = inner;
    let holder = prototype.unwrap_or_else(|| Value::default_for(&result, mode));
    let lifted = native(move |input, out| {
        let (upstream, rest) = match (input, with_rest) {
            (Value::Seq(seq), false) => (seq.clone(), None),
            (Value::Tuple(items), true) => match items.split_first() {
                Some((Value::Seq(seq), rest)) => (seq.clone(), Some(rest.to_vec())),
                _ => return Err(not_implemented("lifted call")),
            },
            _ => return Err(not_implemented("lifted call")),
        };
        let adaptor = LiftSeq::new(upstream, rest, Arc::clone(&element_native), holder.clone());
        *out = Value::seq(Sequence::new(adaptor));
        Ok(())
    });
    Resolution::new(Type::seq(result), lifted)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
