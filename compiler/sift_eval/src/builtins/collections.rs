//! Materializing, ordering and sequence combinators.

use sift_diagnostic::not_implemented;
use sift_ir::Type;
use sift_types::{Registry, Resolution};
use sift_value::{native, Array, EvalResult, Iterate, ReduceKind, Reducer, Sequence, Value};

use super::{args, truth};

pub(super) fn register(registry: &mut Registry) {
    registry.register_poly("array", |arg: &Type| {
        collected(arg).map(|elem| Resolution::new(Type::array(elem), native(fill_array)))
    });
    registry.register_poly("sort", |arg: &Type| {
        if arg.atom().is_some() {
            let prototype = Value::reducer(Reducer::new(ReduceKind::Sort, Value::default_for(arg, Default::default())));
            return Some(
                Resolution::new(Type::array(arg.clone()), native(sort_reducer)).with_prototype(prototype),
            );
        }
        collected(arg).map(|elem| Resolution::new(Type::array(elem), native(sort)))
    });
    registry.register_poly("reverse", |arg: &Type| {
        matches!(arg, Type::Array(_)).then(|| Resolution::new(arg.clone(), native(reverse)))
    });
    registry.register_poly("count", |arg: &Type| {
        matches!(arg, Type::Seq(_) | Type::Array(_) | Type::Map(..))
            .then(|| Resolution::new(Type::uint(), native(count)))
    });
    registry.register_poly("head", |arg: &Type| match arg {
        Type::Tuple(fields) => match fields.as_slice() {
            [seq @ Type::Seq(_), n] if n.is_uint() => Some(Resolution::new(seq.clone(), native(head))),
            _ => None,
        },
        _ => None,
    });
    registry.register_poly("flatten", |arg: &Type| {
        let inner = match arg.seq_element()? {
            Type::Seq(t) | Type::Array(t) => (**t).clone(),
            Type::Map(k, v) => Type::tuple(vec![(**k).clone(), (**v).clone()]),
            _ => return None,
        };
        Some(Resolution::new(Type::seq(inner), native(flatten)))
    });
    registry.register_poly("filter", |arg: &Type| {
        let Some(Type::Tuple(fields)) = arg.seq_element() else {
            return None;
        };
        let (flag, rest) = fields.split_first()?;
        if !flag.is_integer() || rest.is_empty() {
            return None;
        }
        let kept = match rest {
            [single] => single.clone(),
            many => Type::tuple(many.to_vec()),
        };
        Some(Resolution::new(Type::seq(kept), native(filter)))
    });
}

/// Element type of the array `array(arg)` builds: sequences and arrays give
/// their elements, maps their entries, anything else is a single element.
fn collected(arg: &Type) -> Option<Type> {
    let elem = match arg {
        Type::Seq(t) | Type::Array(t) => (**t).clone(),
        Type::Map(k, v) => Type::tuple(vec![(**k).clone(), (**v).clone()]),
        Type::None => return None,
        other => other.clone(),
    };
    (!elem.contains_seq()).then_some(elem)
}

fn fill_array(input: &Value, out: &mut Value) -> EvalResult<()> {
    let seq = Sequence::wrap(input.clone());
    if let Value::Array(array) = out {
        return array.make_mut().fill(&seq);
    }
    let mut array = Array::default();
    array.fill(&seq)?;
    *out = Value::array(array);
    Ok(())
}

fn sort(input: &Value, out: &mut Value) -> EvalResult<()> {
    fill_array(input, out)?;
    if let Value::Array(array) = out {
        array.make_mut().sort();
    }
    Ok(())
}

fn sort_reducer(input: &Value, out: &mut Value) -> EvalResult<()> {
    *out = Value::reducer(Reducer::new(ReduceKind::Sort, input.plain().into_owned()));
    Ok(())
}

fn reverse(input: &Value, out: &mut Value) -> EvalResult<()> {
    let mut array = input.as_array().ok_or_else(|| not_implemented("reverse"))?.clone();
    array.reverse();
    *out = Value::array(array);
    Ok(())
}

fn count(input: &Value, out: &mut Value) -> EvalResult<()> {
    let n = match input {
        Value::Array(array) => array.len() as u64,
        Value::Map(map) => map.len() as u64,
        Value::Seq(seq) => {
            let mut n = 0u64;
            while seq.next()?.is_some() {
                n += 1;
            }
            n
        }
        _ => return Err(not_implemented("count")),
    };
    *out = Value::UInt(n);
    Ok(())
}

fn head(input: &Value, out: &mut Value) -> EvalResult<()> {
    let [seq, n] = args(input, "head")? else {
        return Err(not_implemented("head"));
    };
    let upstream = Sequence::wrap(seq.clone());
    let remaining = n.as_u64().ok_or_else(|| not_implemented("head"))?;
    *out = Value::seq(Sequence::new(Head {
        upstream,
        remaining,
    }));
    Ok(())
}

fn flatten(input: &Value, out: &mut Value) -> EvalResult<()> {
    *out = Value::seq(Sequence::new(Flatten {
        upstream: Sequence::wrap(input.clone()),
        current: None,
    }));
    Ok(())
}

fn filter(input: &Value, out: &mut Value) -> EvalResult<()> {
    *out = Value::seq(Sequence::new(Filter {
        upstream: Sequence::wrap(input.clone()),
    }));
    Ok(())
}

struct Head {
    upstream: Sequence,
    remaining: u64,
}

impl Iterate for Head {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        self.upstream.next()
    }
}

struct Flatten {
    upstream: Sequence,
    current: Option<Sequence>,
}

impl Iterate for Flatten {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        loop {
            if let Some(inner) = &self.current {
                if let Some(v) = inner.next()? {
                    return Ok(Some(v));
                }
                self.current = None;
            }
            match self.upstream.next()? {
                Some(v) => self.current = Some(Sequence::wrap(v)),
                None => return Ok(None),
            }
        }
    }
}

/// Keeps the elements whose first field is non-zero, minus that field.
struct Filter {
    upstream: Sequence,
}

impl Iterate for Filter {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        while let Some(item) = self.upstream.next()? {
            let Some((flag, rest)) = item.as_tuple().and_then(<[Value]>::split_first) else {
                return Err(not_implemented("filter"));
            };
            if truth(flag, "filter")? {
                return Ok(Some(match rest {
                    [single] => single.clone(),
                    many => Value::tuple(many.to_vec()),
                }));
            }
        }
        Ok(None)
    }
}
