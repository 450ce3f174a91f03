use super::*;
use pretty_assertions::assert_eq;
use sift_ir::{dump_block, StringInterner, Type};
use sift_types::{infer, Registry};
use sift_value::MapMode;

fn optimized(source: &str, input: Type) -> (String, usize) {
    let mut interner = StringInterner::new();
    let block = sift_parse::parse(source, &mut interner).unwrap();
    let mut program = infer(block, &input, &Registry::new(), &interner, MapMode::Hashed).unwrap();
    let removed = optimize(&mut program.block);
    (dump_block(&program.block, &interner, false), removed)
}

#[test]
fn test_single_use_temporary_is_removed() {
    let (dump, removed) = optimized("x = 1, x + 2", Type::seq(Type::string()));
    assert_eq!(dump, " VAL 1u\n VAL 2u\n ADD\n");
    assert_eq!(removed, 1);
}

#[test]
fn test_variable_read_twice_is_kept() {
    let (dump, removed) = optimized("x = 1, x + x", Type::seq(Type::string()));
    assert_eq!(dump, " VAL 1u\n VAW x#1\n VAR x#1\n VAR x#1\n ADD\n");
    assert_eq!(removed, 0);
}

#[test]
fn test_closure_reads_count() {
    let (dump, removed) = optimized("x = 1, x, [x : @]", Type::seq(Type::string()));
    assert_eq!(removed, 0);
    assert!(dump.starts_with(" VAL 1u\n VAW x#1\n VAR x#1\n"));
}

#[test]
fn test_nested_blocks_are_optimized() {
    let (dump, removed) = optimized("[y = @ * 2, y + 1 : @]", Type::seq(Type::uint()));
    assert_eq!(
        dump,
        " VAR @#0\n GEN @#1\n   VAR @#1\n   VAL 2u\n   MUL\n   VAL 1u\n   ADD\n"
    );
    assert_eq!(removed, 1);
}

#[test]
fn test_pipe_temporary_is_removed() {
    let (dump, removed) = optimized("3 .. @ + 1", Type::seq(Type::string()));
    assert_eq!(dump, " VAL 3u\n VAL 1u\n ADD\n");
    assert_eq!(removed, 1);
}

#[test]
fn test_inlined_definition_argument_is_removed() {
    let (dump, removed) = optimized("def inc @ + 1; inc(2)", Type::seq(Type::string()));
    assert_eq!(dump, " VAL 2u\n VAL 1u\n ADD\n");
    assert_eq!(removed, 1);
}

#[test]
fn test_recursor_slot_is_kept() {
    let (dump, removed) = optimized("<< @[0] : 0, @ >>", Type::seq(Type::uint()));
    assert_eq!(removed, 0);
    assert!(dump.contains(" REC @#1\n"));
}
