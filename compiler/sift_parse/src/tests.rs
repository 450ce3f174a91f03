use super::*;
use pretty_assertions::assert_eq;
use sift_ir::{dump_block, Atom, Op};

fn dump(source: &str) -> String {
    let mut interner = StringInterner::default();
    let block = parse(source, &mut interner).unwrap();
    dump_block(&block, &interner, false)
}

fn error(source: &str) -> ParseError {
    parse(source, &mut StringInterner::default()).unwrap_err()
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(
        dump("1 + 2 * 3"),
        " VAL 1u\n VAL 2u\n VAL 3u\n MUL\n ADD\n TUP\n"
    );
}

#[test]
fn test_power_is_left_associative() {
    assert_eq!(dump("2 ** 3 ** 2"), " VAL 2u\n VAL 3u\n EXP\n VAL 2u\n EXP\n TUP\n");
}

#[test]
fn test_comparisons_lower_to_eq_lt() {
    assert_eq!(dump("a != b"), " VAR a\n VAR b\n EQ\n NOT\n TUP\n");
    assert_eq!(dump("a > b"), " VAR a\n VAR b\n ROT\n LT\n TUP\n");
    assert_eq!(dump("a <= b"), " VAR a\n VAR b\n ROT\n LT\n NOT\n TUP\n");
    assert_eq!(dump("a >= b"), " VAR a\n VAR b\n LT\n NOT\n TUP\n");
}

#[test]
fn test_negative_literal_and_unary_minus() {
    assert_eq!(dump("-1, - x"), " VAL -1\n VAL 0\n VAR x\n SUB\n TUP\n");
    assert_eq!(dump("a-1"), " VAR a\n VAL 1u\n SUB\n TUP\n");
}

#[test]
fn test_literal_kinds() {
    let mut interner = StringInterner::default();
    let block = parse("3l, 0x10, 2.5, 'a\\tb'", &mut interner).unwrap();
    let atoms: Vec<_> = block.iter().filter_map(|i| i.atom().cloned()).collect();
    assert_eq!(
        atoms,
        vec![Atom::Int(3), Atom::UInt(16), Atom::Real(2.5), Atom::string("a\tb")]
    );
}

#[test]
fn test_generator_with_source() {
    assert_eq!(
        dump("[@ : x]"),
        " GEN\n   VAR @\n   TUP\n -\n   VAR x\n   TUP\n   SEQ\n   TUP\n TUP\n"
    );
}

#[test]
fn test_array_generator_defaults_to_at() {
    assert_eq!(
        dump("[. 1 .]"),
        " GEN\n   VAL 1u\n   TUP\n -\n   VAR @\n   TUP\n   SEQ\n   TUP\n ARR\n TUP\n"
    );
}

#[test]
fn test_map_comprehension() {
    assert_eq!(
        dump("{k -> v}"),
        " GEN\n   VAR k\n   TUP\n   VAR v\n   TUP +1\n   TUP\n   TUP\n -\n   VAR @\n   TUP\n   SEQ\n   TUP\n MAP\n TUP\n"
    );
}

#[test]
fn test_map_value_defaults_to_one() {
    let mut interner = StringInterner::default();
    let block = parse("{@}", &mut interner).unwrap();
    let body = &block[0].closures[0];
    assert_eq!(body[2].atom(), Some(&Atom::Int(1)));
    assert_eq!(block[1].op, Op::Map);
}

#[test]
fn test_chained_index() {
    assert_eq!(
        dump("a[1][2]"),
        " IDX\n   IDX\n     VAR a\n     VAL 1u\n     TUP\n   VAL 2u\n   TUP\n TUP\n"
    );
}

#[test]
fn test_call_and_pipe() {
    assert_eq!(
        dump("@..count(@)"),
        " VAR @\n VAW @\n FUN count\n   VAR @\n   TUP\n TUP\n"
    );
}

#[test]
fn test_call_without_arguments() {
    assert_eq!(dump("now()"), " FUN now\n   TUP\n TUP\n");
}

#[test]
fn test_dot_call_takes_bitwise_argument() {
    assert_eq!(dump("f.x + 1"), " FUN f\n   VAR x\n   VAL 1u\n   ADD\n   TUP\n TUP\n");
}

#[test]
fn test_flatten_and_filter_prefixes() {
    assert_eq!(
        dump(":?x"),
        " FUN flatten\n   FUN filter\n     VAR x\n     TUP\n   TUP\n TUP\n"
    );
}

#[test]
fn test_assignment_then_value() {
    assert_eq!(dump("x = 1; x"), " VAL 1u\n VAW x\n VAR x\n TUP\n");
}

#[test]
fn test_comments_and_newlines() {
    assert_eq!(dump("1 # one\n, 2"), " VAL 1u\n VAL 2u\n TUP\n");
}

#[test]
fn test_unparsed_trailing_input() {
    let err = error("1 )");
    assert_eq!(err.message, "Syntax error, unparsed input: \")\"");
    assert_eq!(err.offset, 2);
}

#[test]
fn test_incomplete_expression() {
    assert_eq!(error("1 +").message, "Syntax error, unparsed input: \"\"");
}

#[test]
fn test_assignment_only_has_no_value() {
    let err = error("x = 1");
    assert!(err.message.starts_with("Expression 'x = 1' has no value"));
}

#[test]
fn test_bad_literal() {
    assert_eq!(
        error("99999999999999999999").message,
        "Could not convert '99999999999999999999' to an unsigned integer."
    );
    assert_eq!(
        error("-99999999999999999999").message,
        "Could not convert '-99999999999999999999' to an integer."
    );
}

#[test]
fn test_comparison_is_not_associative() {
    assert!(error("a < b < c").message.starts_with("Syntax error"));
}

#[test]
fn test_try_generator() {
    assert_eq!(
        dump("[try int(@) : x]"),
        " GEN_TRY\n   FUN int\n     VAR @\n     TUP\n   TUP\n -\n   VAR x\n   TUP\n   SEQ\n   TUP\n TUP\n"
    );
    // `try` alone is still a variable.
    assert_eq!(
        dump("[try]"),
        " GEN\n   VAR try\n   TUP\n -\n   VAR @\n   TUP\n   SEQ\n   TUP\n TUP\n"
    );
}

#[test]
fn test_filter_generator_calls_if() {
    assert_eq!(
        dump("[/ f(@) : x]"),
        " GEN_TRY\n   FUN if\n     FUN f\n       VAR @\n       TUP\n     VAR @\n     TUP\n   TUP\n -\n   VAR x\n   TUP\n   SEQ\n   TUP\n TUP\n"
    );
}

#[test]
fn test_recursor() {
    assert_eq!(
        dump("<< @ : 0, x >>"),
        " REC\n   VAR @\n   TUP\n -\n   VAL 0u\n   VAR x\n   TUP\n TUP\n"
    );
    assert!(error("<< @ : 0, x").message.starts_with("Syntax error"));
}

#[test]
fn test_definitions_have_no_value() {
    assert_eq!(
        dump("def f @ + 1; f(2)"),
        " DEF f\n   VAR @\n   VAL 1u\n   ADD\n   TUP\n FUN f\n   VAL 2u\n   TUP\n TUP\n"
    );
    assert_eq!(dump("def f (@ + 1); f(2)"), dump("def f @ + 1; f(2)"));
    // The parentheses close before the end of the body.
    assert_eq!(dump("def f (1) * 2; f()"), dump("def f 1 * 2; f()"));
    assert!(error("def f 1").message.starts_with("Expression 'def f 1' has no value"));
}

#[test]
fn test_destructuring_definition() {
    assert_eq!(
        dump("def [a, b f(@)]; 1"),
        concat!(
            " DEF a\n   IDX\n     VAR @\n     VAL 0u\n     TUP\n   TUP\n",
            " DEF b\n   IDX\n     VAR @\n     VAL 1u\n     TUP\n   VAW @\n   FUN f\n     VAR @\n     TUP\n   TUP\n",
            " VAL 1u\n TUP\n"
        )
    );
}

#[test]
fn test_dollar_call_prepends_at() {
    assert_eq!(dump("$x"), " FUN $\n   VAR @\n   VAR x\n   TUP\n TUP\n");
    assert_eq!(
        dump("$(x, 1)"),
        " FUN $\n   VAR @\n   VAR x\n   VAL 1u\n   TUP\n TUP\n"
    );
}
