use pretty_assertions::assert_eq;
use sift_diagnostic::{Error, RuntimeError, TypeError};

use crate::common::{sift, sorted};

#[test]
fn test_sort_converted_lines() {
    assert_eq!(sorted("sort(real(@))", "3\n1\n2\n"), "1\n2\n3");
}

#[test]
fn test_cut_prints_one_field_per_line() {
    assert_eq!(sorted("cut(@, \",\")", "a,b\nc,d\n"), "a\nb\nc\nd");
}

#[test]
fn test_min_of_empty_input_fails() {
    assert_eq!(
        sift(&["min(@)"], ""),
        Err(Error::Runtime(RuntimeError::EmptyInput { function: "min" }))
    );
}

#[test]
fn test_index_past_the_end() {
    let err = sift(&["a = [. int(@) : @ .], a[100]"], "1\n2\n3\n").unwrap_err();
    assert_eq!(err.to_string(), "Array index out of bounds");
}

#[test]
fn test_word_count_by_key() {
    let program = "{@ -> sum(1) : :cut(@, ' ')}";
    assert_eq!(sorted(program, "a b\nb c b\n"), "a\t1\nb\t3\nc\t1");
}

#[test]
fn test_map_with_several_reducers() {
    let program = "{cut(@, ',', 0) -> min(int(cut(@, ',', 1))), max(int(cut(@, ',', 1))) : @}";
    assert_eq!(sorted(program, "x,5\ny,1\nx,2\nx,9\n"), "x\t2\t9\ny\t1\t1");
}

#[test]
fn test_pipe_and_assignment() {
    assert_eq!(sorted("n = count(@), n * 2", "a\nb\nc\n"), "6");
    assert_eq!(sorted("sum(int(@)) .. @ + 1", "1\n2\n"), "4");
}

#[test]
fn test_filter_and_flatten_prefixes() {
    assert_eq!(sorted("?[uint(@) > 1, @ : @]", "1\n2\n3\n"), "2\n3");
    assert_eq!(sorted(":cut(@, ',')", "a,b\nc\n"), "a\nb\nc");
}

#[test]
fn test_flatten_of_lines_is_rejected() {
    assert!(matches!(sift(&[":@"], "a\n"), Err(Error::Resolution(_))));
}

#[test]
fn test_sequences_cannot_be_stored() {
    assert!(matches!(
        sift(&["[. [@ : @] : @ .]"], "a\n"),
        Err(Error::Type(TypeError::StoredSequence { .. }))
    ));
}

#[test]
fn test_materializing_nested_sequences_is_rejected() {
    for program in ["array([[@ : @] : @])", "sort([[@ : @] : @])"] {
        assert!(
            matches!(sift(&["-s", program], "ab\ncd\n"), Err(Error::Resolution(_))),
            "{program} should not type-check"
        );
    }
}

#[test]
fn test_try_generator_drops_unparsable_lines() {
    assert_eq!(sorted("sum([try int(@) : @])", "1\nx\n5\n"), "6");
    assert!(matches!(sift(&["sum(int(@))"], "1\nx\n"), Err(Error::Runtime(_))));
}

#[test]
fn test_filter_generator() {
    assert_eq!(sorted("[/ uint(@) > 1 : @]", "1\n2\n3\n"), "2\n3");
}

#[test]
fn test_recursor_running_total() {
    assert_eq!(sorted("<< @[0] + uint(@[1]) : 0, @ >>", "1\n2\n3\n"), "6");
    assert!(matches!(
        sift(&["<< @[1] : 0, @ >>"], "a\n"),
        Err(Error::Type(TypeError::RecursorBody { .. }))
    ));
}

#[test]
fn test_definitions() {
    assert_eq!(sorted("def inc @ + 1; inc(inc(1))", ""), "3");
    let program = "def [name, size uint(@)]; {name(@) -> sum(size(@)) : cut(@, ' ')}";
    assert_eq!(sorted(program, "a 1\nb 2\na 3\n"), "a\t4\nb\t2");
    assert_eq!(
        sift(&["def f f(@); f(1)"], ""),
        Err(Error::Type(TypeError::RecursiveDefinition("f".into())))
    );
}

#[test]
fn test_uniques_counts_distinct_lines() {
    assert_eq!(sorted("uniques(@)", "a\nb\na\nc\n"), "3");
}

#[test]
fn test_parse_error_reports_the_rest() {
    match sift(&["1 + )"], "") {
        Err(Error::Parse(err)) => assert!(err.message.contains("unparsed")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_program_file_is_prepended() {
    let dir = std::env::temp_dir().join(format!("sift-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("prelude.sift");
    std::fs::write(&path, "k = 10\n").unwrap();
    let out = sift(&["-f", path.to_str().unwrap(), "k + 1"], "").unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
    assert_eq!(out, "11");
}

#[test]
fn test_program_file_can_hold_definitions() {
    let dir = std::env::temp_dir().join(format!("sift-e2e-def-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("defs.sift");
    std::fs::write(&path, "def double @ * 2\n").unwrap();
    let out = sift(&["-f", path.to_str().unwrap(), "double(21)"], "").unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
    assert_eq!(out, "42");
}
