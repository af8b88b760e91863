//! Conversion policy for writes into typed slots.
//!
//! `convert_to_kind` runs when a value reaches its destination slot:
//!
//! - `Nil` goes into nilable kinds only
//! - big-number slots take any integer or float and always store a fresh
//!   big number
//! - machine numbers widen losslessly into other machine-number slots
//! - whole arrays and maps convert element by element, failing on the
//!   first element that cannot convert
//! - anonymous structs adopt the slot's struct name when their shape is
//!   exactly the registered one
//!
//! Anything else passes through unchanged in permissive mode and is caught
//! by `store_checked` at the store site. Strict mode fails immediately.

use zest_value::{type_mismatch, EvalResult, Kind, StructRegistry, StructValue, Value};

use crate::eval_mode::EvalMode;

/// Convert `value` for storage in a slot of `kind`.
pub fn convert_to_kind(
    value: Value,
    kind: &Kind,
    registry: &StructRegistry,
    mode: EvalMode,
) -> EvalResult {
    if *kind == Kind::Any {
        return Ok(value);
    }
    if value.is_nil() {
        return if kind.is_nilable() {
            Ok(Value::Nil)
        } else {
            Err(type_mismatch(&kind.to_string(), "nil"))
        };
    }

    match kind {
        Kind::BigInt if value.is_numeric() => {
            return value
                .to_big_int()
                .map(Value::big_int)
                .ok_or_else(|| type_mismatch("bigint", &describe(&value)));
        }
        Kind::BigFloat if value.is_numeric() => {
            return value
                .to_big_float()
                .map(Value::big_float)
                .ok_or_else(|| type_mismatch("bigfloat", &describe(&value)));
        }
        Kind::Int | Kind::Int64 | Kind::UInt | Kind::UInt64 | Kind::Float => {
            if let Some(widened) = widen_machine(&value, kind) {
                return Ok(widened);
            }
        }
        Kind::Array(elem) => {
            if let Value::Array(arr) = &value {
                if arr.elem == **elem {
                    return Ok(value);
                }
                let items = arr
                    .items
                    .iter()
                    .map(|item| convert_element(item.clone(), elem, registry, mode))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Value::array((**elem).clone(), items));
            }
        }
        Kind::Map(elem) => {
            if let Value::Map(map) = &value {
                if map.elem == **elem {
                    return Ok(value);
                }
                let entries = map
                    .entries
                    .iter()
                    .map(|(key, item)| {
                        convert_element(item.clone(), elem, registry, mode)
                            .map(|item| (key.clone(), item))
                    })
                    .collect::<Result<_, _>>()?;
                return Ok(Value::map((**elem).clone(), entries));
            }
        }
        Kind::Struct(name) => {
            if let Value::Struct(s) = &value {
                if s.is_anonymous() && registry.is_shape_of(name, s) {
                    let named = StructValue::new(name.clone(), s.fields.clone());
                    return Ok(Value::struct_value(named));
                }
            }
        }
        _ => {}
    }

    if kind.admits(&value) {
        return Ok(value);
    }
    if mode.allows_passthrough() {
        tracing::warn!(
            slot = %kind,
            value = value.type_name(),
            "no conversion applies, deferring to store site"
        );
        Ok(value)
    } else {
        Err(type_mismatch(&kind.to_string(), &describe(&value)))
    }
}

/// Store-site check: reject values a slot of `kind` does not admit.
pub fn store_checked(value: Value, kind: &Kind) -> EvalResult {
    if kind.admits(&value) {
        Ok(value)
    } else {
        Err(type_mismatch(&kind.to_string(), &describe(&value)))
    }
}

fn convert_element(
    item: Value,
    elem: &Kind,
    registry: &StructRegistry,
    mode: EvalMode,
) -> EvalResult {
    let converted = convert_to_kind(item, elem, registry, mode)?;
    store_checked(converted, elem)
}

/// Lossless widening between machine numbers.
fn widen_machine(value: &Value, kind: &Kind) -> Option<Value> {
    if let Value::Float(f) = value {
        return (*kind == Kind::Float).then_some(Value::Float(*f));
    }
    let n = value.as_i128()?;
    match kind {
        Kind::Int => i64::try_from(n).ok().map(Value::Int),
        Kind::Int64 => i64::try_from(n).ok().map(Value::Int64),
        Kind::UInt => u64::try_from(n).ok().map(Value::UInt),
        Kind::UInt64 => u64::try_from(n).ok().map(Value::UInt64),
        Kind::Float => value.as_f64().map(Value::Float),
        _ => None,
    }
}

/// Kind-level description of a value for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Struct(s) if s.is_anonymous() => "struct".to_string(),
        other => Kind::of(other).to_string(),
    }
}
