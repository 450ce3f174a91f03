use std::io::Cursor;

use super::*;
use pretty_assertions::assert_eq;

fn texts(seq: &Sequence) -> Vec<String> {
    seq.collect()
        .unwrap()
        .iter()
        .map(|v| v.to_text().unwrap())
        .collect()
}

#[test]
fn test_lines_strip_terminators() {
    let seq = lines(Cursor::new("a\nb\r\n\nlast"));
    assert_eq!(texts(&seq), vec!["a", "b", "", "last"]);
}

#[test]
fn test_empty_input_has_no_lines() {
    let seq = lines(Cursor::new(""));
    assert_eq!(seq.next().unwrap(), None);
}

#[test]
fn test_shared_source_hands_out_each_line_once() {
    let shared = SharedSource::new(Lines::new(Cursor::new("1\n2\n3\n4\n")));
    let (a, b) = (shared.sequence(), shared.sequence());
    let mut seen = Vec::new();
    seen.push(a.next().unwrap().unwrap().to_text().unwrap());
    seen.push(b.next().unwrap().unwrap().to_text().unwrap());
    seen.extend(texts(&a));
    assert_eq!(seen, vec!["1", "2", "3", "4"]);
    assert_eq!(b.next().unwrap(), None);
}
