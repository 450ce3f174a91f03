use super::*;
use crate::ReduceKind;
use pretty_assertions::assert_eq;
use rustc_hash::FxHasher;

fn hash_of(v: &Value) -> u64 {
    let mut h = FxHasher::default();
    v.hash(&mut h);
    h.finish()
}

#[test]
fn test_default_for_types() {
    let ty = Type::tuple(vec![Type::int(), Type::string(), Type::array(Type::real())]);
    let v = Value::default_for(&ty, MapMode::Hashed);
    let fields = v.as_tuple().unwrap();
    assert_eq!(fields[0], Value::Int(0));
    assert_eq!(fields[1], Value::string(""));
    assert!(fields[2].as_array().unwrap().is_empty());
}

#[test]
fn test_default_map_uses_mode() {
    let ty = Type::map(Type::string(), Type::int());
    let v = Value::default_for(&ty, MapMode::Ordered);
    assert_eq!(v.as_map().unwrap().mode(), MapMode::Ordered);
}

#[test]
fn test_int_and_uint_are_distinct() {
    assert_ne!(Value::Int(1), Value::UInt(1));
    assert!(Value::Int(5) < Value::UInt(0));
}

#[test]
fn test_real_ordering_is_total() {
    assert!(Value::Real(-1.0) < Value::Real(0.5));
    assert_eq!(Value::Real(f64::NAN), Value::Real(f64::NAN));
}

#[test]
fn test_tuple_ordering_is_lexicographic() {
    let a = Value::tuple(vec![Value::Int(1), Value::string("b")]);
    let b = Value::tuple(vec![Value::Int(1), Value::string("c")]);
    assert!(a < b);
}

#[test]
fn test_array_equality_ignores_storage() {
    let typed = Value::array(Array::from_values(vec![Value::Int(1), Value::Int(2)]));
    let generic = Value::array(Array::Values(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(typed, generic);
    assert_eq!(hash_of(&typed), hash_of(&generic));
}

#[test]
fn test_map_equality_ignores_mode() {
    let mut ordered = MapValue::new(MapMode::Ordered);
    let mut hashed = MapValue::new(MapMode::Hashed);
    for (k, v) in [("x", 1), ("y", 2), ("z", 3)] {
        ordered.merge_insert(Value::string(k), Value::Int(v)).unwrap();
        hashed.merge_insert(Value::string(k), Value::Int(v)).unwrap();
    }
    let (a, b) = (Value::map(ordered), Value::map(hashed));
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_reducer_reads_as_current_value() {
    let r = Value::reducer(Reducer::new(ReduceKind::Sum, Value::Int(7)));
    assert_eq!(r.as_i64(), Some(7));
    assert_eq!(r, Value::Int(7));
    assert_eq!(hash_of(&r), hash_of(&Value::Int(7)));
    assert_eq!(r.kind_name(), "Int");
}

#[test]
fn test_merge_replaces_plain_values() {
    let mut v = Value::string("old");
    v.merge(Value::string("new")).unwrap();
    assert_eq!(v, Value::string("new"));
}

#[test]
fn test_merge_tuples_fieldwise() {
    let mut acc = Value::tuple(vec![
        Value::reducer(Reducer::new(ReduceKind::Sum, Value::Int(1))),
        Value::string("a"),
    ]);
    let next = Value::tuple(vec![
        Value::reducer(Reducer::new(ReduceKind::Sum, Value::Int(2))),
        Value::string("b"),
    ]);
    acc.merge(next).unwrap();
    acc.merge_end();
    assert_eq!(acc, Value::tuple(vec![Value::Int(3), Value::string("b")]));
    assert!(matches!(acc.as_tuple().unwrap()[0], Value::Int(3)));
}

#[test]
fn test_merge_end_settles_reducer() {
    let mut v = Value::reducer(Reducer::new(ReduceKind::Max, Value::UInt(4)));
    v.merge_end();
    assert!(matches!(v, Value::UInt(4)));
}

#[test]
fn test_clone_is_copy_on_write() {
    let a = Value::array(Array::from_values(vec![Value::Int(1)]));
    let mut b = a.clone();
    if let Value::Array(arr) = &mut b {
        arr.make_mut().push(Value::Int(2));
    }
    assert_eq!(a.as_array().unwrap().len(), 1);
    assert_eq!(b.as_array().unwrap().len(), 2);
}

#[test]
fn test_from_atom() {
    assert_eq!(Value::from_atom(&Atom::string("hi")), Value::string("hi"));
    assert_eq!(Value::from_atom(&Atom::UInt(3)), Value::UInt(3));
}
