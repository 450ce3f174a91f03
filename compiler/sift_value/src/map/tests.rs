use super::*;
use crate::{ReduceKind, Reducer};
use pretty_assertions::assert_eq;

fn pairs(items: &[(&str, i64)]) -> Sequence {
    let values = items
        .iter()
        .map(|(k, v)| Value::tuple(vec![Value::string(k), Value::Int(*v)]))
        .collect();
    Sequence::wrap(Value::array(crate::Array::Values(values)))
}

#[test]
fn test_fill_last_value_wins() {
    let mut m = MapValue::new(MapMode::Ordered);
    m.fill(&pairs(&[("a", 1), ("b", 2), ("a", 3)])).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&Value::string("a")), Some(&Value::Int(3)));
}

#[test]
fn test_fill_merges_reducers() {
    let mut m = MapValue::new(MapMode::Hashed);
    let items: Vec<Value> = [("a", 1), ("b", 5), ("a", 4)]
        .iter()
        .map(|(k, v)| {
            Value::tuple(vec![
                Value::string(k),
                Value::reducer(Reducer::new(ReduceKind::Sum, Value::Int(*v))),
            ])
        })
        .collect();
    m.fill(&Sequence::wrap(Value::array(crate::Array::Values(items))))
        .unwrap();
    assert!(matches!(m.get(&Value::string("a")), Some(Value::Int(5))));
    assert!(matches!(m.get(&Value::string("b")), Some(Value::Int(5))));
}

#[test]
fn test_fill_rejects_non_pairs() {
    let mut m = MapValue::new(MapMode::Hashed);
    let err = m.fill(&Sequence::wrap(Value::Int(1))).unwrap_err();
    assert!(matches!(err, sift_diagnostic::RuntimeError::NotImplemented(_)));
}

#[test]
fn test_ordered_iteration_follows_keys() {
    let mut m = MapValue::new(MapMode::Ordered);
    m.fill(&pairs(&[("c", 1), ("a", 2), ("b", 3)])).unwrap();
    let keys: Vec<_> = m.entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![Value::string("a"), Value::string("b"), Value::string("c")]);
}

#[test]
fn test_fill_clears_previous_contents() {
    let mut m = MapValue::new(MapMode::Hashed);
    m.fill(&pairs(&[("old", 1)])).unwrap();
    m.fill(&pairs(&[("new", 2)])).unwrap();
    assert_eq!(m.len(), 1);
    assert!(m.get(&Value::string("old")).is_none());
}
