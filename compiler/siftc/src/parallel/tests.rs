use std::io::Cursor;
use std::sync::Arc;

use super::*;
use pretty_assertions::assert_eq;
use sift_diagnostic::RuntimeError;
use sift_value::MapMode;

use crate::input::Lines;

fn session() -> Session {
    Session::new(Arc::new(sift_eval::default_registry()), MapMode::Ordered)
}

fn numbers(n: u32) -> Lines<Cursor<String>> {
    let text: String = (1..=n).map(|i| format!("{i}\n")).collect();
    Lines::new(Cursor::new(text))
}

fn sorted_lines(text: &str) -> Vec<u64> {
    let mut values: Vec<u64> = text.lines().map(|l| l.parse().unwrap()).collect();
    values.sort_unstable();
    values
}

#[test]
fn test_split_at_the_first_arrow() {
    let split = Split::new("int(@) --> sum(@)");
    assert_eq!(split.scatter, "int(@) ");
    assert_eq!(split.gather, " sum(@)");
    assert_eq!(split.gather_offset, 10);

    assert_eq!(Split::new("count(@)").gather, "@");
    assert_eq!(Split::new("int(@) -->").gather, "@");
}

#[test]
fn test_single_worker_keeps_order() {
    let out = run(&session(), "[int(@) * 2 : @]", 1, numbers(4)).unwrap();
    assert_eq!(out, "2\n4\n6\n8");
}

#[test]
fn test_gather_reduces_all_workers() {
    let out = run(&session(), "uint(@) --> sum(@)", 4, numbers(100)).unwrap();
    assert_eq!(out, "5050");
}

#[test]
fn test_workers_partition_the_input() {
    let out = run(&session(), "uint(@)", 3, numbers(50)).unwrap();
    assert_eq!(sorted_lines(&out), (1..=50).collect::<Vec<u64>>());
}

#[test]
fn test_scalar_worker_results_are_wrapped() {
    let out = run(&session(), "count(@) --> sum(@)", 2, numbers(10)).unwrap();
    assert_eq!(out, "10");
}

#[test]
fn test_worker_errors_abort_the_run() {
    let input = Lines::new(Cursor::new("1\nx\n3\n".to_string()));
    match run(&session(), "int(@)", 2, input) {
        Err(Error::Runtime(RuntimeError::Worker { .. })) => {}
        other => panic!("expected a worker error, got {other:?}"),
    }
}

#[test]
fn test_sequence_elements_are_rejected() {
    let result = run(&session(), "[[@ : cut(@, ',')] : @]", 2, numbers(1));
    assert!(matches!(
        result,
        Err(Error::Type(TypeError::StoredSequence { .. }))
    ));
}

#[test]
fn test_gather_parse_errors_point_into_the_whole_program() {
    match run(&session(), "@ --> 1 +", 1, numbers(1)) {
        Err(Error::Parse(err)) => assert!(err.offset >= 5),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
