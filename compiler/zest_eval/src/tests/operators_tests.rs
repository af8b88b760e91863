//! Tests for binary operator implementations.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use zest_ir::BinaryOp;
use zest_value::{ErrorCategory, EvalErrorKind, Heap, Kind, StructField, StructValue, Value};

use crate::eval_mode::EvalMode;
use crate::operators::evaluate_binary;

fn eval(left: Value, right: Value, op: BinaryOp) -> Value {
    evaluate_binary(&left, &right, op, EvalMode::Permissive).unwrap()
}

fn eval_err(left: Value, right: Value, op: BinaryOp) -> ErrorCategory {
    evaluate_binary(&left, &right, op, EvalMode::Permissive)
        .unwrap_err()
        .category()
}

fn ints(kind: Kind, items: &[i64]) -> Value {
    Value::array(kind, items.iter().copied().map(Value::int).collect())
}

#[test]
fn test_int_operations() {
    assert_eq!(eval(Value::int(1), Value::int(2), BinaryOp::Add), Value::int(3));
    assert_eq!(eval(Value::int(5), Value::int(3), BinaryOp::Sub), Value::int(2));
    assert_eq!(eval(Value::int(2), Value::int(3), BinaryOp::Mul), Value::int(6));
    assert_eq!(eval(Value::int(7), Value::int(2), BinaryOp::Div), Value::int(3));
    assert_eq!(eval(Value::int(-7), Value::int(2), BinaryOp::Mod), Value::int(-1));
    assert_eq!(eval(Value::int(3), Value::int(4), BinaryOp::Pow), Value::int(81));
}

#[test]
fn test_result_width() {
    assert_eq!(eval(Value::int(1), Value::uint(2), BinaryOp::Add), Value::int(3));
    assert_eq!(eval(Value::int64(1), Value::uint(2), BinaryOp::Add), Value::int64(3));
    assert_eq!(eval(Value::uint(1), Value::uint(2), BinaryOp::Add), Value::uint(3));
    assert_eq!(
        eval(Value::uint(1), Value::uint64(2), BinaryOp::Add),
        Value::uint64(3)
    );
}

#[test]
fn test_int_float_promotion() {
    assert_eq!(eval(Value::int(1), Value::float(2.5), BinaryOp::Add), Value::float(3.5));
    assert_eq!(eval(Value::int(2), Value::int(-1), BinaryOp::Pow), Value::float(0.5));
}

#[test]
fn test_overflow_is_detected() {
    assert_eq!(
        eval_err(Value::int(i64::MAX), Value::int(1), BinaryOp::Add),
        ErrorCategory::Type
    );
    assert_eq!(
        eval_err(Value::uint(0), Value::uint(1), BinaryOp::Sub),
        ErrorCategory::Type
    );
    assert_eq!(
        eval_err(Value::int(2), Value::int(100), BinaryOp::Pow),
        ErrorCategory::Type
    );
    assert_eq!(
        eval_err(Value::int(i64::MIN), Value::int(-1), BinaryOp::Div),
        ErrorCategory::Type
    );
}

#[test]
fn test_division_by_zero() {
    for (left, right) in [
        (Value::int(5), Value::int(0)),
        (Value::float(5.0), Value::float(0.0)),
        (Value::float(5.0), Value::int(0)),
        (Value::big_int(BigInt::from(5)), Value::int(0)),
        (Value::big_float(BigDecimal::from(5i64)), Value::float(0.0)),
    ] {
        assert_eq!(
            eval_err(left.clone(), right.clone(), BinaryOp::Div),
            ErrorCategory::DivideByZero
        );
        assert_eq!(
            eval_err(left, right, BinaryOp::Mod),
            ErrorCategory::DivideByZero
        );
    }
}

#[test]
fn test_big_int_power_leaves_operands_alone() {
    let two = Value::big_int(BigInt::from(2));
    let hundred = Value::int(100);
    let result = evaluate_binary(&two, &hundred, BinaryOp::Pow, EvalMode::Permissive).unwrap();
    assert_eq!(result.to_string(), "1267650600228229401496703205376");
    assert_eq!(two, Value::big_int(BigInt::from(2)));
    assert_eq!(hundred, Value::int(100));
}

#[test]
fn test_big_int_result_is_fresh() {
    let zero = Value::big_int(BigInt::from(0));
    let n = Value::big_int(BigInt::from(42));
    let sum = eval(n.clone(), zero, BinaryOp::Add);
    let (Value::BigInt(a), Value::BigInt(b)) = (&n, &sum) else {
        panic!("expected big ints");
    };
    assert!(!Heap::ptr_eq(a, b));
    assert_eq!(sum, n);
}

#[test]
fn test_big_int_negative_power() {
    let result = eval(Value::big_int(BigInt::from(2)), Value::int(-2), BinaryOp::Pow);
    assert_eq!(result.to_string(), "0.25");
    assert_eq!(
        eval_err(Value::big_int(BigInt::from(0)), Value::int(-1), BinaryOp::Pow),
        ErrorCategory::DivideByZero
    );
}

#[test]
fn test_big_float_arithmetic() {
    let one_and_half = Value::big_float(BigDecimal::new(BigInt::from(15), 1));
    assert_eq!(
        eval(one_and_half.clone(), Value::int(1), BinaryOp::Add).to_string(),
        "2.5"
    );
    assert_eq!(
        eval(one_and_half.clone(), Value::big_int(BigInt::from(2)), BinaryOp::Mul).to_string(),
        "3"
    );
    assert_eq!(eval(one_and_half, Value::int(2), BinaryOp::Pow).to_string(), "2.25");

    let third = eval(
        Value::big_float(BigDecimal::from(1i64)),
        Value::int(3),
        BinaryOp::Div,
    );
    assert!(third.to_string().starts_with("0.33333333333333333333"));
}

#[test]
fn test_big_float_fractional_exponent_rejected() {
    let half = Value::big_float(BigDecimal::new(BigInt::from(5), 1));
    assert_eq!(
        eval_err(Value::big_float(BigDecimal::from(4i64)), half, BinaryOp::Pow),
        ErrorCategory::Eval
    );
}

#[test]
fn test_shifts() {
    assert_eq!(eval(Value::int(1), Value::int(3), BinaryOp::Shl), Value::int(8));
    assert_eq!(eval(Value::int(-8), Value::int(1), BinaryOp::Shr), Value::int(-4));
    assert_eq!(eval(Value::int(5), Value::int(200), BinaryOp::Shr), Value::int(0));
    assert_eq!(
        eval(Value::uint64(1), Value::uint64(63), BinaryOp::Shl),
        Value::uint64(1 << 63)
    );
    assert_eq!(
        eval_err(Value::int(1), Value::int(63), BinaryOp::Shl),
        ErrorCategory::Type
    );
    assert_eq!(
        eval_err(Value::int(1), Value::int(-1), BinaryOp::Shl),
        ErrorCategory::Eval
    );
    assert_eq!(
        eval(Value::big_int(BigInt::from(1)), Value::int(100), BinaryOp::Shl).to_string(),
        "1267650600228229401496703205376"
    );
}

#[test]
fn test_big_results_are_bounded() {
    let one = || Value::big_int(BigInt::from(1));
    let two = || Value::big_int(BigInt::from(2));
    assert_eq!(
        eval_err(one(), Value::int(1 << 62), BinaryOp::Shl),
        ErrorCategory::Type
    );
    assert_eq!(
        eval_err(two(), Value::int(i64::from(u32::MAX)), BinaryOp::Pow),
        ErrorCategory::Type
    );
    assert_eq!(
        eval_err(two(), Value::int(-i64::from(u32::MAX)), BinaryOp::Pow),
        ErrorCategory::Type
    );
    let wide = eval(one(), Value::int(1 << 23), BinaryOp::Shl);
    assert_eq!(
        eval_err(wide.clone(), wide, BinaryOp::Mul),
        ErrorCategory::Type
    );

    // unit bases and right shifts stay small whatever the count
    assert_eq!(eval(one(), Value::int(1 << 62), BinaryOp::Pow), one());
    assert_eq!(
        eval(Value::big_int(BigInt::from(-1)), Value::int(i64::MAX), BinaryOp::Pow),
        Value::big_int(BigInt::from(-1))
    );
    assert_eq!(
        eval(Value::big_int(BigInt::from(-5)), Value::int(1 << 62), BinaryOp::Shr),
        Value::big_int(BigInt::from(-1))
    );
    assert_eq!(
        eval(Value::big_int(BigInt::from(0)), Value::int(1 << 62), BinaryOp::Shl),
        Value::big_int(BigInt::from(0))
    );
}

#[test]
fn test_comparisons() {
    assert_eq!(eval(Value::int(1), Value::float(2.5), BinaryOp::Lt), Value::Bool(true));
    assert_eq!(eval(Value::int(3), Value::uint(3), BinaryOp::GtEq), Value::Bool(true));
    assert_eq!(
        eval(Value::string("b"), Value::string("a"), BinaryOp::Gt),
        Value::Bool(true)
    );
    assert_eq!(
        eval(Value::float(f64::NAN), Value::float(f64::NAN), BinaryOp::Eq),
        Value::Bool(true)
    );
    assert_eq!(
        eval(Value::float(f64::NAN), Value::float(1.0), BinaryOp::LtEq),
        Value::Bool(false)
    );
    assert_eq!(
        eval(Value::int(1), Value::string("1"), BinaryOp::NotEq),
        Value::Bool(true)
    );
    assert_eq!(
        eval_err(Value::string("a"), Value::int(1), BinaryOp::Lt),
        ErrorCategory::Type
    );
}

#[test]
fn test_string_operations() {
    assert_eq!(
        eval(Value::string("ab"), Value::string("cd"), BinaryOp::Add),
        Value::string("abcd")
    );
    assert_eq!(
        eval(Value::string("ab"), Value::int(3), BinaryOp::Mul),
        Value::string("ababab")
    );
    assert_eq!(
        eval(Value::int(3), Value::string("ab"), BinaryOp::Mul),
        Value::string("ababab")
    );
    assert_eq!(
        eval(Value::string("ab"), Value::int(0), BinaryOp::Mul),
        Value::string("")
    );
    assert_eq!(
        eval_err(Value::string("ab"), Value::int(-1), BinaryOp::Mul),
        ErrorCategory::Eval
    );
    assert_eq!(
        eval_err(Value::string("ab"), Value::string("a"), BinaryOp::Sub),
        ErrorCategory::Type
    );
}

#[test]
fn test_repetition_is_bounded() {
    assert_eq!(
        eval_err(Value::string("ab"), Value::int(1 << 40), BinaryOp::Mul),
        ErrorCategory::Type
    );
    let role = Value::struct_value(StructValue::new("Role", Vec::new()));
    assert_eq!(
        eval_err(Value::int(1 << 40), role, BinaryOp::Mul),
        ErrorCategory::Type
    );
    assert_eq!(
        eval(Value::string("ab"), Value::int(3), BinaryOp::Mul),
        Value::string("ababab")
    );
}

#[test]
fn test_string_and_nil() {
    assert_eq!(
        eval(Value::string("x="), Value::Nil, BinaryOp::Add),
        Value::string("x=nil")
    );
    assert_eq!(
        eval(Value::Nil, Value::string("!"), BinaryOp::Add),
        Value::string("nil!")
    );
}

#[test]
fn test_implicit_string_conversion() {
    assert_eq!(
        eval(Value::string("n="), Value::float(1.5), BinaryOp::Add),
        Value::string("n=1.5")
    );
    assert_eq!(
        eval(Value::Bool(true), Value::string("!"), BinaryOp::Add),
        Value::string("true!")
    );

    let err = evaluate_binary(
        &Value::string("n="),
        &Value::int(1),
        BinaryOp::Add,
        EvalMode::Strict,
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ImplicitConversion {
            type_name: "int".to_string()
        }
    );
    assert!(err.is_warning());
}

#[test]
fn test_broadcast() {
    assert_eq!(
        eval(ints(Kind::Int, &[1, 2, 3]), Value::int(10), BinaryOp::Add),
        ints(Kind::Int, &[11, 12, 13])
    );
    assert_eq!(
        eval(ints(Kind::Int, &[1, 2, 3]), Value::int(1), BinaryOp::Sub),
        ints(Kind::Int, &[0, 1, 2])
    );
    assert_eq!(
        eval(Value::int(1), ints(Kind::Int, &[1, 2, 3]), BinaryOp::Sub),
        ints(Kind::Int, &[0, -1, -2])
    );
    assert_eq!(
        eval(ints(Kind::Int, &[1, 2]), Value::float(0.5), BinaryOp::Mul),
        Value::array(Kind::Float, vec![Value::float(0.5), Value::float(1.0)])
    );
    assert_eq!(
        eval(ints(Kind::Int, &[]), Value::int(1), BinaryOp::Add),
        ints(Kind::Int, &[])
    );
    assert_eq!(
        eval_err(ints(Kind::Int, &[1]), Value::int(0), BinaryOp::Div),
        ErrorCategory::DivideByZero
    );
}

#[test]
fn test_broadcast_mixed_results_are_boxed() {
    let mixed = Value::array(Kind::Any, vec![Value::int(1), Value::float(1.5)]);
    let result = eval(mixed, Value::int(1), BinaryOp::Add);
    assert_eq!(result.as_array().map(|a| a.elem.clone()), Some(Kind::Any));
    assert_eq!(result.to_string(), "[2 2.5]");
}

#[test]
fn test_broadcast_requires_numeric_array() {
    let words = Value::array(Kind::Str, vec![Value::string("a"), Value::string("b")]);
    assert_eq!(
        eval_err(words.clone(), Value::int(1), BinaryOp::Add),
        ErrorCategory::Type
    );
    assert_eq!(eval_err(Value::int(1), words, BinaryOp::Mul), ErrorCategory::Type);

    let boxed = Value::array(Kind::Any, vec![Value::int(1), Value::string("b")]);
    assert_eq!(eval_err(boxed, Value::int(1), BinaryOp::Add), ErrorCategory::Type);

    let grid = Value::array(
        Kind::Array(Box::new(Kind::Int)),
        vec![ints(Kind::Int, &[1, 2]), ints(Kind::Int, &[3])],
    );
    assert_eq!(eval(grid, Value::int(1), BinaryOp::Add).to_string(), "[[2 3] [4]]");
}

#[test]
fn test_array_concatenation() {
    assert_eq!(
        eval(ints(Kind::Int, &[1]), ints(Kind::Int, &[2]), BinaryOp::Add),
        ints(Kind::Int, &[1, 2])
    );
    let boxed = eval(ints(Kind::Int, &[1]), ints(Kind::Any, &[2]), BinaryOp::Add);
    assert_eq!(boxed.as_array().map(|a| a.elem.clone()), Some(Kind::Any));
    let strings = Value::array(Kind::Str, vec![Value::string("a")]);
    assert_eq!(
        eval_err(ints(Kind::Int, &[1]), strings, BinaryOp::Add),
        ErrorCategory::Type
    );
}

#[test]
fn test_map_union_is_right_biased() {
    let mut left = FxHashMap::default();
    left.insert("a".to_string(), Value::int(1));
    left.insert("b".to_string(), Value::int(2));
    let mut right = FxHashMap::default();
    right.insert("b".to_string(), Value::int(3));
    right.insert("c".to_string(), Value::int(4));
    let merged = eval(
        Value::map(Kind::Int, left),
        Value::map(Kind::Int, right),
        BinaryOp::Add,
    );
    assert_eq!(merged.to_string(), "map[a:1 b:3 c:4]");
}

#[test]
fn test_struct_replication() {
    let role = Value::struct_value(StructValue::new(
        "Role",
        vec![StructField::new("Name", Kind::Str, Value::string("guest"))],
    ));
    let copies = eval(Value::int(2), role.clone(), BinaryOp::Mul);
    let arr = copies.as_array().unwrap();
    assert_eq!(arr.elem, Kind::Struct("Role".to_string()));
    assert_eq!(arr.items, vec![role.clone(), role.clone()]);
    let (Value::Struct(a), Value::Struct(b)) = (&arr.items[0], &arr.items[1]) else {
        panic!("expected structs");
    };
    assert!(!Heap::ptr_eq(a, b));
}

#[test]
fn test_mismatched_operands() {
    assert_eq!(
        eval_err(Value::Bool(true), Value::int(1), BinaryOp::Add),
        ErrorCategory::Type
    );
    let err = evaluate_binary(
        &Value::string("a"),
        &Value::array(Kind::Any, Vec::new()),
        BinaryOp::Add,
        EvalMode::Permissive,
    )
    .unwrap_err();
    assert_eq!(err.message, "cannot apply `+` to `string` and `array`");
}
