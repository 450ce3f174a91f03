use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_unsigned() {
    assert_eq!(unsigned("42").unwrap(), Atom::UInt(42));
    assert_eq!(unsigned("42u").unwrap(), Atom::UInt(42));
    assert_eq!(unsigned("99999999999999999999999"), Err(BadLiteral("an unsigned integer")));
}

#[test]
fn test_hex() {
    assert_eq!(hex("0xff").unwrap(), Atom::UInt(255));
    assert_eq!(hex("0X10").unwrap(), Atom::UInt(16));
}

#[test]
fn test_signed() {
    assert_eq!(signed("5l", false).unwrap(), Atom::Int(5));
    assert_eq!(signed("7", true).unwrap(), Atom::Int(-7));
    assert_eq!(signed("9223372036854775808", true).unwrap(), Atom::Int(i64::MIN));
    assert_eq!(signed("9223372036854775808s", false), Err(BadLiteral("an integer")));
}

#[test]
fn test_float() {
    assert_eq!(float("1.", false).unwrap(), Atom::Real(1.0));
    assert_eq!(float("2.5E-3", true).unwrap(), Atom::Real(-0.0025));
}

#[test]
fn test_string_escapes() {
    assert_eq!(string(r#""a\tb""#), "a\tb");
    assert_eq!(string(r"'it\'s'"), "it's");
    assert_eq!(string(r#""\e[0m\q""#), "\x1b[0mq");
    assert_eq!(string("''"), "");
}
