use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_factory_messages() {
    assert_eq!(division_by_zero().message, "division by zero");
    assert_eq!(
        integer_overflow("addition").message,
        "integer overflow in addition"
    );
    assert_eq!(
        binary_type_mismatch(BinaryOp::Add, "string", "bool").message,
        "cannot apply `+` to `string` and `bool`"
    );
    assert_eq!(
        invalid_unary_op("string", UnaryOp::Neg).message,
        "operator `-` cannot be applied to string"
    );
    assert_eq!(
        index_out_of_bounds(5, 3).message,
        "index 5 out of bounds for length 3"
    );
}

#[test]
fn test_categories() {
    assert_eq!(division_by_zero().category(), ErrorCategory::DivideByZero);
    assert_eq!(modulo_by_zero().category(), ErrorCategory::DivideByZero);
    assert_eq!(syntax_error("unmatched [").category(), ErrorCategory::Syntax);
    assert_eq!(not_enough_values().category(), ErrorCategory::Syntax);
    assert_eq!(negative_index(-1).category(), ErrorCategory::Index);
    assert_eq!(key_not_found("k").category(), ErrorCategory::Index);
    assert_eq!(field_not_found("Name").category(), ErrorCategory::Field);
    assert_eq!(
        unsupported_access_kind("field", "array").category(),
        ErrorCategory::Type
    );
    assert_eq!(
        ambiguous_struct_match(2).category(),
        ErrorCategory::AmbiguousStruct
    );
    assert_eq!(EvalError::new("eval failed").category(), ErrorCategory::Eval);
}

#[test]
fn test_warning_class() {
    assert!(implicit_conversion("int").is_warning());
    assert!(!type_mismatch("int", "string").is_warning());
}

#[test]
fn test_display_includes_span_and_notes() {
    let err = dissimilar_struct_types("User", "Role").with_span(Span::new(4, 9));
    assert_eq!(
        err.to_string(),
        "type mismatch: expected User, got Role at 4..9\n  note: dissimilar struct types"
    );
}
