//! Deep equality and ordering.
//!
//! Both follow the numeric coercion lattice: machine integers compare
//! exactly, arbitrary-precision values compare by numeric value after
//! promotion, and floats compare as floats. Equality never fails; ordering
//! fails for operand kinds that have no order.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use zest_ir::BinaryOp;
use zest_value::{binary_type_mismatch, ensure_sufficient_stack, EvalError, Value};

/// Language-level equality.
///
/// `NaN` equals `NaN`. Arrays compare element-wise and maps key-wise,
/// ignoring element-kind metadata and insertion order. Structs compare
/// field-wise by canonical name; a named struct never equals a struct with
/// a different name, while anonymous structs compare by shape.
pub fn deep_equal(left: &Value, right: &Value) -> bool {
    ensure_sufficient_stack(|| match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a.as_str() == b.as_str(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.items
                    .iter()
                    .zip(b.items.iter())
                    .all(|(l, r)| deep_equal(l, r))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.entries.len() == b.entries.len()
                && a.entries
                    .iter()
                    .all(|(key, l)| b.entries.get(key).is_some_and(|r| deep_equal(l, r)))
        }
        (Value::Struct(a), Value::Struct(b)) => {
            (a.is_anonymous() || b.is_anonymous() || a.name == b.name)
                && a.fields.len() == b.fields.len()
                && a.fields
                    .iter()
                    .all(|field| b.field(&field.name).is_some_and(|r| deep_equal(&field.value, r)))
        }
        (l, r) if l.is_numeric() && r.is_numeric() => {
            numeric_order(l, r).map_or_else(|| both_nan(l, r), Ordering::is_eq)
        }
        _ => false,
    })
}

/// Ordering for `<`, `<=`, `>`, `>=`.
///
/// `Ok(None)` means the operands are unordered (a `NaN` is involved).
pub fn compare_values(
    left: &Value,
    right: &Value,
    op: BinaryOp,
) -> Result<Option<Ordering>, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.as_str().cmp(b.as_str()))),
        (l, r) if l.is_numeric() && r.is_numeric() => Ok(numeric_order(l, r)),
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

/// Numeric ordering across the lattice. Both operands must be numeric.
fn numeric_order(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (left.as_i128(), right.as_i128()) {
        return Some(a.cmp(&b));
    }
    let big = matches!(left, Value::BigInt(_) | Value::BigFloat(_))
        || matches!(right, Value::BigInt(_) | Value::BigFloat(_));
    if big {
        if let (Some(a), Some(b)) = (exact(left), exact(right)) {
            return Some(a.cmp(&b));
        }
    }
    // Plain floats, or a non-finite float against a big number
    let (a, b) = (left.as_f64()?, right.as_f64()?);
    a.partial_cmp(&b)
}

/// Exact decimal form of a numeric value. Non-finite floats have none.
fn exact(value: &Value) -> Option<BigDecimal> {
    value.to_big_float()
}

fn both_nan(left: &Value, right: &Value) -> bool {
    matches!((left, right), (Value::Float(a), Value::Float(b)) if a.is_nan() && b.is_nan())
}
