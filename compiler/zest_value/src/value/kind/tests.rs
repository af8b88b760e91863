use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_scalars() {
    assert_eq!(Kind::parse("int"), Kind::Int);
    assert_eq!(Kind::parse("uint64"), Kind::UInt64);
    assert_eq!(Kind::parse("float"), Kind::Float);
    assert_eq!(Kind::parse("float64"), Kind::Float);
    assert_eq!(Kind::parse("bigi"), Kind::BigInt);
    assert_eq!(Kind::parse("bigfloat"), Kind::BigFloat);
    assert_eq!(Kind::parse("string"), Kind::Str);
    assert_eq!(Kind::parse("interface{}"), Kind::Any);
}

#[test]
fn test_parse_composites() {
    assert_eq!(
        Kind::parse("[][]int"),
        Kind::Array(Box::new(Kind::Array(Box::new(Kind::Int))))
    );
    assert_eq!(
        Kind::parse("map[string]Role"),
        Kind::Map(Box::new(Kind::Struct("Role".to_string())))
    );
    assert_eq!(Kind::parse("map"), Kind::Map(Box::new(Kind::Any)));
    assert_eq!(Kind::parse("*User"), Kind::Struct("User".to_string()));
}

#[test]
fn test_display_parses_back() {
    for text in ["int", "[]string", "map[string][]bigint", "User", "any"] {
        assert_eq!(Kind::parse(text).to_string(), text);
    }
}

#[test]
fn test_of_and_common() {
    assert_eq!(Kind::of(&Value::Nil), Kind::Any);
    assert_eq!(Kind::of(&Value::uint(3)), Kind::UInt);
    let ints = [Value::int(1), Value::int(2)];
    assert_eq!(Kind::common(&ints), Kind::Int);
    let mixed = [Value::int(1), Value::float(2.0)];
    assert_eq!(Kind::common(&mixed), Kind::Any);
    assert_eq!(Kind::common(std::iter::empty()), Kind::Any);
}

#[test]
fn test_admits() {
    assert!(Kind::Any.admits(&Value::string("x")));
    assert!(Kind::Int.admits(&Value::int(1)));
    assert!(!Kind::Int.admits(&Value::int64(1)));
    assert!(!Kind::Int.admits(&Value::Nil));
    assert!(Kind::Struct("User".to_string()).admits(&Value::Nil));

    let ints = Kind::Array(Box::new(Kind::Int));
    assert!(ints.admits(&Value::array(Kind::Int, vec![Value::int(1)])));
    assert!(ints.admits(&Value::array(Kind::Any, vec![Value::int(1)])));
    assert!(!ints.admits(&Value::array(Kind::Any, vec![Value::string("a")])));
}

#[test]
fn test_numeric_kinds() {
    for kind in [
        Kind::Int,
        Kind::UInt64,
        Kind::Float,
        Kind::BigInt,
        Kind::BigFloat,
    ] {
        assert!(kind.is_numeric(), "{kind}");
    }
    for kind in [
        Kind::Any,
        Kind::Bool,
        Kind::Str,
        Kind::Array(Box::new(Kind::Int)),
    ] {
        assert!(!kind.is_numeric(), "{kind}");
    }
}
