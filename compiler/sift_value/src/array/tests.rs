use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ints(xs: &[i64]) -> Array {
    Array::Int(xs.to_vec())
}

#[test]
fn test_for_element_picks_storage() {
    assert!(matches!(Array::for_element(&Type::real()), Array::Real(_)));
    assert!(matches!(Array::for_element(&Type::string()), Array::Str(_)));
    assert!(matches!(
        Array::for_element(&Type::tuple(vec![Type::int(), Type::int()])),
        Array::Values(_)
    ));
}

#[test]
fn test_push_mismatch_generalizes() {
    let mut a = ints(&[1, 2]);
    a.push(Value::string("x"));
    assert!(matches!(a, Array::Values(_)));
    assert_eq!(a.len(), 3);
    assert_eq!(a.get(0), Some(Value::Int(1)));
    assert_eq!(a.get(2), Some(Value::string("x")));
}

#[test]
fn test_fill_replaces_contents() {
    let mut a = ints(&[9, 9, 9]);
    let seq = Sequence::wrap(Value::array(ints(&[1, 2])));
    a.fill(&seq).unwrap();
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_slice_is_inclusive() {
    let a = ints(&[10, 20, 30, 40]);
    assert_eq!(a.slice(1, 2).iter().collect::<Vec<_>>(), vec![Value::Int(20), Value::Int(30)]);
}

#[test]
fn test_sort_strings() {
    let mut a = Array::from_values(vec![Value::string("b"), Value::string("a"), Value::string("c")]);
    a.sort();
    let sorted: Vec<_> = a.iter().map(|v| v.as_str().unwrap_or_default().to_string()).collect();
    assert_eq!(sorted, vec!["a", "b", "c"]);
}

#[test]
fn test_extend_mixed() {
    let mut a = ints(&[1]);
    a.extend(&Array::Real(vec![2.5]));
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![Value::Int(1), Value::Real(2.5)]);
}

proptest! {
    #[test]
    fn test_sort_matches_vec_sort(xs in proptest::collection::vec(any::<i64>(), 0..64)) {
        let mut a = Array::from_values(xs.iter().copied().map(Value::Int).collect());
        a.sort();
        let mut expected = xs.clone();
        expected.sort_unstable();
        prop_assert_eq!(a.iter().collect::<Vec<_>>(), expected.into_iter().map(Value::Int).collect::<Vec<_>>());
    }

    #[test]
    fn test_reverse_twice_is_identity(xs in proptest::collection::vec(any::<u64>(), 0..32)) {
        let original = Array::UInt(xs);
        let mut a = original.clone();
        a.reverse();
        a.reverse();
        prop_assert_eq!(Value::array(a), Value::array(original));
    }
}
