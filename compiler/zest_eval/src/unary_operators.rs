//! Unary operator implementations.
//!
//! Provides direct enum-based dispatch for unary operations. Big number
//! results are always fresh allocations, even for `+`.

use zest_ir::UnaryOp;
use zest_value::{integer_overflow, invalid_unary_op, EvalResult, Value};

/// Evaluate a unary operation using direct pattern matching.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    match (value, op) {
        // Numeric normalization
        (
            Value::Int(_)
            | Value::Int64(_)
            | Value::UInt(_)
            | Value::UInt64(_)
            | Value::Float(_),
            UnaryOp::Plus,
        ) => Ok(value.clone()),
        (Value::BigInt(_) | Value::BigFloat(_), UnaryOp::Plus) => Ok(value.deep_copy()),

        // Numeric negation
        (Value::Int(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (Value::Int64(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(Value::Int64)
            .ok_or_else(|| integer_overflow("negation")),
        // Negating an unsigned value yields the signed kind of the same width
        (Value::UInt(n), UnaryOp::Neg) => negate_unsigned(*n).map(Value::Int),
        (Value::UInt64(n), UnaryOp::Neg) => negate_unsigned(*n).map(Value::Int64),
        (Value::Float(f), UnaryOp::Neg) => Ok(Value::Float(-f)),
        (Value::BigInt(b), UnaryOp::Neg) => Ok(Value::big_int(-&**b)),
        (Value::BigFloat(b), UnaryOp::Neg) => Ok(Value::big_float(-&**b)),

        // Logical not
        (Value::Bool(b), UnaryOp::Not) => Ok(Value::Bool(!b)),

        // Invalid combinations
        _ => Err(invalid_unary_op(value.type_name(), op)),
    }
}

fn negate_unsigned(n: u64) -> Result<i64, zest_value::EvalError> {
    i64::try_from(i128::from(n).wrapping_neg()).map_err(|_| integer_overflow("negation"))
}

