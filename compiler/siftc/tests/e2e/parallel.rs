use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::sift;

fn numbered(n: usize) -> String {
    (1..=n).map(|i| format!("{i}\n")).collect()
}

#[test]
fn test_arrow_selects_scatter_gather() {
    assert_eq!(sift(&["int(@) --> sum(@)"], &numbered(10)).unwrap(), "55");
    assert_eq!(sift(&["-t", "4", "int(@) --> sum(@)"], &numbered(10)).unwrap(), "55");
}

#[test]
fn test_gather_builds_a_map() {
    let out = sift(
        &["-s", "-t", "3", "[uint(@) % 2 : @] --> {@ -> sum(1)}"],
        &numbered(9),
    )
    .unwrap();
    assert_eq!(out, "0\t4\n1\t5");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_single_worker_matches_serial(lines in prop::collection::vec(0u16..500, 0..30)) {
        let input: String = lines.iter().map(|n| format!("{n}\n")).collect();
        for program in ["uint(@)", "sort(uint(@))", "count(@)", "{uint(@) % 3 -> sum(1) : @}"] {
            let serial = sift(&["-s", program], &input).unwrap();
            let parallel = sift(&["-s", "-t", "1", program], &input).unwrap();
            prop_assert_eq!(serial, parallel);
        }
    }
}
