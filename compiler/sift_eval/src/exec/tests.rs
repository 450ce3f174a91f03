use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sift_diagnostic::RuntimeError;
use sift_ir::StringInterner;
use sift_value::Array;

use crate::default_registry;

fn lines(items: &[&str]) -> Value {
    let values = items.iter().map(|s| Value::string(s)).collect();
    Value::seq(Sequence::wrap(Value::array(Array::from_values(values))))
}

fn compile(source: &str, mode: MapMode) -> Result<Executor, Error> {
    let mut interner = StringInterner::new();
    let block = sift_parse::parse(source, &mut interner)?;
    let mut program = sift_types::infer(
        block,
        &Type::seq(Type::string()),
        &default_registry(),
        &interner,
        mode,
    )?;
    sift_opt::optimize(&mut program.block);
    Ok(Executor::new(&program, mode)?)
}

fn eval_in(source: &str, input: &[&str], mode: MapMode) -> Result<String, Error> {
    let executor = compile(source, mode)?;
    let result = executor.run(lines(input))?;
    Ok(result.to_text()?)
}

fn eval(source: &str, input: &[&str]) -> String {
    eval_in(source, input, MapMode::Hashed).unwrap()
}

fn runtime_error(source: &str, input: &[&str]) -> RuntimeError {
    match eval_in(source, input, MapMode::Hashed) {
        Err(Error::Runtime(e)) => e,
        other => panic!("expected a runtime error for {source:?}, got {other:?}"),
    }
}

/// Endless `"7"` lines, counting pulls.
struct Counting(Arc<AtomicUsize>);

impl Iterate for Counting {
    fn next(&mut self) -> EvalResult<Option<Value>> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Value::string("7")))
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("1 + 2 * 3", &[]), "7");
    assert_eq!(eval("7 / 2", &[]), "3");
    assert_eq!(eval("2 ** 10", &[]), "1024");
    assert_eq!(eval("1u - 2u", &[]), "-1");
    assert_eq!(eval("7.0 / 2", &[]), "3.5");
    assert_eq!(eval("3 > 2, 3 < 2", &[]), "1\t0");
}

#[test]
fn test_division_by_zero_is_a_runtime_error() {
    assert_eq!(runtime_error("1 / 0", &[]), RuntimeError::DivisionByZero);
}

#[test]
fn test_sort_of_converted_lines() {
    assert_eq!(eval("sort(real(@))", &["3", "1", "2"]), "1\n2\n3");
    assert_eq!(eval("reverse(sort(uint(@)))", &["3", "1", "2"]), "3\n2\n1");
}

#[test]
fn test_lifted_cut_prints_every_field() {
    assert_eq!(eval("cut(@, ',')", &["a,b", "c,d"]), "a\nb\nc\nd");
    assert_eq!(eval(":cut(@, ',')", &["a,b", "c"]), "a\nb\nc");
    assert_eq!(eval("join(cut('a,b', ','), '-')", &[]), "a-b");
}

#[test]
fn test_flatten_of_atoms_does_not_resolve() {
    assert!(matches!(
        eval_in(":@", &["a"], MapMode::Hashed),
        Err(Error::Resolution(_))
    ));
}

#[test]
fn test_reducers_over_lines() {
    assert_eq!(eval("sum(int(@))", &["1", "2", "3"]), "6");
    assert_eq!(eval("avg(real(@))", &["1", "2", "3"]), "2");
    assert_eq!(eval("var(real(@))", &["1", "2", "3", "4"]), "1.25");
    assert_eq!(eval("count(@)", &["x", "y", "z"]), "3");
    assert_eq!(
        runtime_error("min(int(@))", &[]),
        RuntimeError::EmptyInput { function: "min" }
    );
}

#[test]
fn test_map_groups_duplicate_keys() {
    let out = eval_in(
        "{@[0] -> sum(int(@[1])) : cut(@, ',')}",
        &["a,1", "b,2", "a,3"],
        MapMode::Ordered,
    )
    .unwrap();
    assert_eq!(out, "a\t4\nb\t2");
}

#[test]
fn test_array_index_out_of_bounds() {
    assert_eq!(
        runtime_error("a = [. int(@) : @ .], a[100]", &["1", "2"]),
        RuntimeError::IndexOutOfBounds
    );
    assert_eq!(eval("a = [. int(@) : @ .], a[1]", &["1", "2"]), "2");
}

#[test]
fn test_generator_reads_outer_variables() {
    assert_eq!(eval("x = 10, [int(@) + x : @]", &["1", "2"]), "11\n12");
}

#[test]
fn test_filter_keeps_flagged_rows() {
    assert_eq!(eval("?[uint(@) > 1, @ : @]", &["1", "5", "3"]), "5\n3");
}

#[test]
fn test_sequences_are_lazy() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let executor = compile("head(int(@), 2)", MapMode::Hashed).unwrap();
    let input = Value::seq(Sequence::new(Counting(Arc::clone(&pulls))));
    let result = executor.run(input).unwrap();
    assert_eq!(pulls.load(Ordering::SeqCst), 0);
    assert_eq!(result.to_text().unwrap(), "7\n7");
    assert_eq!(pulls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_try_generator_skips_failing_elements() {
    assert_eq!(eval("[try int(@) : @]", &["1", "x", "3"]), "1\n3");
    assert!(matches!(
        runtime_error("[int(@) : @]", &["1", "x"]),
        RuntimeError::Conversion { .. }
    ));
}

#[test]
fn test_filter_generator_keeps_true_conditions() {
    assert_eq!(eval("[/ uint(@) > 1 : @]", &["1", "5", "3"]), "5\n3");
    assert_eq!(eval("[/ @ == 'b']", &["a", "b"]), "b");
}

#[test]
fn test_recursor_folds_left_to_right() {
    assert_eq!(eval("<< @[0] + uint(@[1]) : 0, @ >>", &["1", "2", "3"]), "6");
    assert_eq!(eval("<< @[0] * 10 + uint(@[1]) : 0, @ >>", &["1", "2", "3"]), "123");
    assert_eq!(eval("<< @[0] + 1 : 5, @ >>", &[]), "5");
}

#[test]
fn test_definitions_run_inlined() {
    assert_eq!(eval("def sq @ * @; [sq(int(@)) : @]", &["2", "3"]), "4\n9");
    assert_eq!(eval("def [k, v int(@)]; v(cut(@, '='))", &["a=1"]), "1");
    assert_eq!(eval("def $ @[1] + 1; $2", &[]), "3");
}

#[test]
fn test_uniques_over_lines() {
    assert_eq!(eval("uniques(@)", &["a", "b", "a"]), "2");
}

proptest! {
    #[test]
    fn test_sort_yields_the_sorted_multiset(xs in prop::collection::vec(0u32..1000, 0..20)) {
        let text: Vec<String> = xs.iter().map(u32::to_string).collect();
        let input: Vec<&str> = text.iter().map(String::as_str).collect();
        let mut expected = xs.clone();
        expected.sort_unstable();
        let expected: Vec<String> = expected.iter().map(u32::to_string).collect();
        prop_assert_eq!(eval("sort(uint(@))", &input), expected.join("\n"));
    }
}
