//! Reductions.
//!
//! On a scalar argument each of these returns a reducer seeded with that
//! value, which accumulates when merged under a duplicate map key. On a
//! sequence or array it folds all elements at once.
//!
//! `uniques` accepts any storable value, arrays included as whole elements
//! when they come from a sequence.

use sift_diagnostic::empty_input;
use sift_ir::Type;
use sift_types::{Registry, Resolution};
use sift_value::{native, MapMode, NativeFn, ReduceKind, Reducer, Sequence, Value};

const KINDS: [ReduceKind; 7] = [
    ReduceKind::Sum,
    ReduceKind::Min,
    ReduceKind::Max,
    ReduceKind::Avg,
    ReduceKind::Var,
    ReduceKind::Stdev,
    ReduceKind::Uniques,
];

pub(super) fn register(registry: &mut Registry) {
    for kind in KINDS {
        registry.register_poly(kind.name(), move |arg: &Type| resolve(kind, arg));
    }
}

fn accepts(kind: ReduceKind, elem: &Type) -> bool {
    match kind {
        ReduceKind::Min | ReduceKind::Max => elem.atom().is_some(),
        ReduceKind::Uniques => *elem != Type::None && !elem.contains_seq(),
        _ => elem.is_numeric(),
    }
}

fn result_type(kind: ReduceKind, elem: &Type) -> Type {
    match kind {
        ReduceKind::Avg | ReduceKind::Var | ReduceKind::Stdev => Type::real(),
        ReduceKind::Uniques => Type::uint(),
        _ => elem.clone(),
    }
}

fn resolve(kind: ReduceKind, arg: &Type) -> Option<Resolution> {
    let is_array = matches!(arg, Type::Array(_));
    if accepts(kind, arg) && !is_array {
        let seed = Value::default_for(arg, MapMode::default());
        let prototype = Value::reducer(Reducer::new(kind, seed));
        return Some(Resolution::new(result_type(kind, arg), seeded(kind)).with_prototype(prototype));
    }
    let elem = match arg {
        Type::Seq(t) | Type::Array(t) => t,
        _ => return None,
    };
    accepts(kind, elem).then(|| Resolution::new(result_type(kind, elem), fold(kind)))
}

fn seeded(kind: ReduceKind) -> NativeFn {
    native(move |input, out| {
        *out = Value::reducer(Reducer::new(kind, input.plain().into_owned()));
        Ok(())
    })
}

/// Fold every element. An empty sum or unique count leaves the zero holder
/// in place.
fn fold(kind: ReduceKind) -> NativeFn {
    native(move |input, out| {
        let seq = Sequence::wrap(input.clone());
        let Some(first) = seq.next()? else {
            return match kind {
                ReduceKind::Sum | ReduceKind::Uniques => Ok(()),
                _ => Err(empty_input(kind.name())),
            };
        };
        let mut acc = Reducer::new(kind, first);
        while let Some(v) = seq.next()? {
            acc.merge(&Reducer::new(kind, v))?;
        }
        acc.finish();
        *out = acc.into_value();
        Ok(())
    })
}
