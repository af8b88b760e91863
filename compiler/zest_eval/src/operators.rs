//! Binary operator implementations.
//!
//! Direct enum-based dispatch over the closed value set. Numeric operands go
//! through one coercion lattice, checked in this order:
//!
//! 1. either side is a big float: both promote to big float
//! 2. either side is a big int: both promote to big int
//! 3. both are machine integers: checked native integer arithmetic
//! 4. otherwise (a float is involved): native float arithmetic
//!
//! Division and remainder by zero always fail, for floats too. Every big
//! number result is a fresh allocation; operands are never modified.
//!
//! Non-numeric extensions: string concatenation and repetition, array
//! concatenation, right-biased map union, struct replication, and scalar
//! broadcasting over numeric arrays.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rustc_hash::FxHashMap;
use zest_ir::BinaryOp;
use zest_value::{
    binary_type_mismatch, division_by_zero, implicit_conversion, integer_overflow,
    invalid_binary_op_for, modulo_by_zero, negative_count, ArrayValue, EvalError, EvalResult,
    Kind, StructValue, Value, BIG_FLOAT_PRECISION, MAX_BIG_BITS,
};

use crate::compare::{compare_values, deep_equal};
use crate::eval_mode::EvalMode;

/// Longest string, in bytes, and largest struct count `*` may produce.
const MAX_REPEAT_LEN: usize = 1 << 24;

// Direct Dispatch Function

/// Evaluate a binary operation.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp, mode: EvalMode) -> EvalResult {
    if op.is_equality() {
        let equal = deep_equal(left, right);
        return Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }));
    }
    if op.is_ordering() {
        let ordering = compare_values(left, right, op)?;
        return Ok(Value::Bool(ordering_holds(op, ordering)));
    }

    match (left, right) {
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        (Value::Str(a), Value::Nil) if op == BinaryOp::Add => {
            Ok(Value::string(format!("{}nil", a.as_str())))
        }
        (Value::Nil, Value::Str(b)) if op == BinaryOp::Add => {
            Ok(Value::string(format!("nil{}", b.as_str())))
        }
        (Value::Str(a), other) if op == BinaryOp::Add && is_stringable(other) => {
            check_implicit_conversion(other, mode)?;
            Ok(Value::string(format!("{}{other}", a.as_str())))
        }
        (other, Value::Str(b)) if op == BinaryOp::Add && is_stringable(other) => {
            check_implicit_conversion(other, mode)?;
            Ok(Value::string(format!("{other}{}", b.as_str())))
        }
        (Value::Str(s), count) | (count, Value::Str(s))
            if op == BinaryOp::Mul && count.is_machine_int() =>
        {
            repeat_string(s, count)
        }
        (Value::Struct(s), count) | (count, Value::Struct(s))
            if op == BinaryOp::Mul && count.is_machine_int() =>
        {
            replicate_struct(s, count)
        }
        (Value::Array(a), Value::Array(b)) if op == BinaryOp::Add => {
            concat_arrays(&a.elem, &a.items, &b.elem, &b.items, left, right, op)
        }
        (Value::Map(a), Value::Map(b)) if op == BinaryOp::Add => {
            let elem = if a.elem == b.elem { a.elem.clone() } else { Kind::Any };
            let mut entries: FxHashMap<String, Value> = a.entries.clone();
            entries.extend(b.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
            Ok(Value::map(elem, entries))
        }
        (Value::Array(arr), scalar)
            if op.broadcasts() && scalar.is_numeric() && is_numeric_array(arr) =>
        {
            broadcast(&arr.elem, &arr.items, |item| {
                evaluate_binary(item, scalar, op, mode)
            })
        }
        (scalar, Value::Array(arr))
            if op.broadcasts() && scalar.is_numeric() && is_numeric_array(arr) =>
        {
            broadcast(&arr.elem, &arr.items, |item| {
                evaluate_binary(scalar, item, op, mode)
            })
        }
        (l, r) if l.is_numeric() && r.is_numeric() => eval_numeric_binary(l, r, op),
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

fn ordering_holds(op: BinaryOp, ordering: Option<Ordering>) -> bool {
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => false,
    }
}

// String Extensions

fn is_stringable(value: &Value) -> bool {
    value.is_numeric() || matches!(value, Value::Bool(_))
}

fn check_implicit_conversion(value: &Value, mode: EvalMode) -> Result<(), EvalError> {
    if mode.allows_implicit_string_conversion() {
        Ok(())
    } else {
        Err(implicit_conversion(value.type_name()))
    }
}

fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::string(format!("{a}{b}"))),
        _ => Err(invalid_binary_op_for("strings", op)),
    }
}

/// Non-negative repetition count from a machine integer.
fn repeat_count(count: &Value) -> Result<usize, EvalError> {
    let n = count.as_i128().unwrap_or_default();
    if n < 0 {
        return Err(negative_count(n));
    }
    usize::try_from(n).map_err(|_| integer_overflow("repetition"))
}

fn repeat_string(s: &str, count: &Value) -> EvalResult {
    let n = repeat_count(count)?;
    s.len()
        .checked_mul(n)
        .filter(|len| *len <= MAX_REPEAT_LEN)
        .ok_or_else(|| integer_overflow("repetition"))?;
    Ok(Value::string(s.repeat(n)))
}

/// `n * struct`: an array of `n` independent copies.
fn replicate_struct(s: &StructValue, count: &Value) -> EvalResult {
    let n = repeat_count(count)?;
    if n > MAX_REPEAT_LEN {
        return Err(integer_overflow("repetition"));
    }
    let template = Value::struct_value(s.clone());
    let items = (0..n).map(|_| template.deep_copy()).collect();
    Ok(Value::array(Kind::of(&template), items))
}

// Collection Extensions

fn concat_arrays(
    left_elem: &Kind,
    left_items: &[Value],
    right_elem: &Kind,
    right_items: &[Value],
    left: &Value,
    right: &Value,
    op: BinaryOp,
) -> EvalResult {
    let elem = if left_elem == right_elem {
        left_elem.clone()
    } else if *left_elem == Kind::Any || *right_elem == Kind::Any {
        Kind::Any
    } else {
        return Err(binary_type_mismatch(
            op,
            &Kind::of(left).to_string(),
            &Kind::of(right).to_string(),
        ));
    };
    let mut items = Vec::with_capacity(left_items.len() + right_items.len());
    items.extend_from_slice(left_items);
    items.extend_from_slice(right_items);
    Ok(Value::array(elem, items))
}

/// Whether an array holds numbers only, at any nesting depth.
///
/// Boxed arrays are checked element by element.
fn is_numeric_array(arr: &ArrayValue) -> bool {
    let mut elem = &arr.elem;
    while let Kind::Array(inner) = elem {
        elem = inner;
    }
    if elem.is_numeric() {
        return true;
    }
    *elem == Kind::Any
        && arr.items.iter().all(|item| match item {
            Value::Array(inner) => is_numeric_array(inner),
            other => other.is_numeric(),
        })
}

/// Apply `f` to every element of a numeric array.
///
/// The result keeps the element kind the results share, or becomes a
/// boxed array when they differ. An empty array keeps its kind.
fn broadcast(elem: &Kind, items: &[Value], f: impl Fn(&Value) -> EvalResult) -> EvalResult {
    let results = items.iter().map(f).collect::<Result<Vec<_>, _>>()?;
    let kind = if results.is_empty() {
        elem.clone()
    } else {
        Kind::common(&results)
    };
    Ok(Value::array(kind, results))
}

// Numeric Lattice

fn eval_numeric_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let is_big_float = |v: &Value| matches!(v, Value::BigFloat(_));
    let is_big_int = |v: &Value| matches!(v, Value::BigInt(_));

    if is_big_float(left) || is_big_float(right) {
        let (a, b) = promote(left, right, op, Value::to_big_float)?;
        eval_big_float_binary(&a, &b, op)
    } else if is_big_int(left) || is_big_int(right) {
        let (a, b) = promote(left, right, op, Value::to_big_int)?;
        eval_big_int_binary(&a, &b, op)
    } else if left.is_machine_int() && right.is_machine_int() {
        eval_int_binary(left, right, op)
    } else {
        match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => eval_float_binary(a, b, op),
            _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
        }
    }
}

/// Promote both operands with `to`; fails for non-finite floats.
fn promote<T>(
    left: &Value,
    right: &Value,
    op: BinaryOp,
    to: fn(&Value) -> Option<T>,
) -> Result<(T, T), EvalError> {
    match (to(left), to(right)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

/// Width of a machine integer result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum IntWidth {
    Int,
    Int64,
    UInt,
    UInt64,
}

impl IntWidth {
    /// Both unsigned: unsigned, 64-bit if either is. Otherwise signed,
    /// 64-bit if either is.
    fn of(left: &Value, right: &Value) -> Self {
        let unsigned = |v: &Value| matches!(v, Value::UInt(_) | Value::UInt64(_));
        let is_64 = matches!(left, Value::Int64(_) | Value::UInt64(_))
            || matches!(right, Value::Int64(_) | Value::UInt64(_));
        match (unsigned(left) && unsigned(right), is_64) {
            (true, true) => IntWidth::UInt64,
            (true, false) => IntWidth::UInt,
            (false, true) => IntWidth::Int64,
            (false, false) => IntWidth::Int,
        }
    }

    fn fits(self, n: i128) -> bool {
        match self {
            IntWidth::Int | IntWidth::Int64 => i64::try_from(n).is_ok(),
            IntWidth::UInt | IntWidth::UInt64 => u64::try_from(n).is_ok(),
        }
    }

    fn wrap(self, n: i128, op: BinaryOp) -> EvalResult {
        let overflow = || integer_overflow(op.operation_name());
        match self {
            IntWidth::Int => i64::try_from(n).map(Value::Int).map_err(|_| overflow()),
            IntWidth::Int64 => i64::try_from(n).map(Value::Int64).map_err(|_| overflow()),
            IntWidth::UInt => u64::try_from(n).map(Value::UInt).map_err(|_| overflow()),
            IntWidth::UInt64 => u64::try_from(n).map(Value::UInt64).map_err(|_| overflow()),
        }
    }
}

/// Binary operations on machine integers.
///
/// Operands are widened to `i128`, which holds every `i64` and `u64`, so
/// only the final narrowing to the result width can overflow.
fn eval_int_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let (Some(a), Some(b)) = (left.as_i128(), right.as_i128()) else {
        return Err(binary_type_mismatch(op, left.type_name(), right.type_name()));
    };
    let width = IntWidth::of(left, right);
    if !width.fits(a) || !width.fits(b) {
        return Err(integer_overflow(op.operation_name()));
    }
    let overflow = || integer_overflow(op.operation_name());
    let result = match op {
        BinaryOp::Add => a.checked_add(b).ok_or_else(overflow)?,
        BinaryOp::Sub => a.checked_sub(b).ok_or_else(overflow)?,
        BinaryOp::Mul => a.checked_mul(b).ok_or_else(overflow)?,
        BinaryOp::Div if b == 0 => return Err(division_by_zero()),
        BinaryOp::Div => a.checked_div(b).ok_or_else(overflow)?,
        BinaryOp::Mod if b == 0 => return Err(modulo_by_zero()),
        BinaryOp::Mod => a.checked_rem(b).ok_or_else(overflow)?,
        BinaryOp::Pow if b < 0 => return Ok(Value::Float(float_pow(a, b))),
        BinaryOp::Pow => {
            let exp = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exp).ok_or_else(overflow)?
        }
        BinaryOp::Shl => {
            let shift = shift_amount(b)?;
            if a == 0 {
                0
            } else {
                // anything shifted past 127 bits cannot fit the result width
                let factor = 1_i128
                    .checked_shl(shift)
                    .filter(|f| *f > 0)
                    .ok_or_else(overflow)?;
                a.checked_mul(factor).ok_or_else(overflow)?
            }
        }
        BinaryOp::Shr => a >> shift_amount(b)?.min(127),
        _ => return Err(invalid_binary_op_for("integers", op)),
    };
    width.wrap(result, op)
}

#[allow(
    clippy::cast_precision_loss,
    reason = "a negative exponent leaves the integers for the floats"
)]
fn float_pow(a: i128, b: i128) -> f64 {
    (a as f64).powf(b as f64)
}

fn shift_amount(count: i128) -> Result<u32, EvalError> {
    if count < 0 {
        return Err(EvalError::new(format!("negative shift count {count}")));
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Binary operations on floats.
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div if b == 0.0 => Err(division_by_zero()),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod if b == 0.0 => Err(modulo_by_zero()),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        BinaryOp::Pow => Ok(Value::Float(a.powf(b))),
        _ => Err(invalid_binary_op_for("floats", op)),
    }
}

/// Binary operations on arbitrary-precision integers.
///
/// Division truncates toward zero and the remainder takes the sign of the
/// dividend.
fn eval_big_int_binary(a: &BigInt, b: &BigInt, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::big_int(a + b)),
        BinaryOp::Sub => Ok(Value::big_int(a - b)),
        BinaryOp::Mul if a.bits() + b.bits() > MAX_BIG_BITS => {
            Err(integer_overflow(op.operation_name()))
        }
        BinaryOp::Mul => Ok(Value::big_int(a * b)),
        BinaryOp::Div if b.is_zero() => Err(division_by_zero()),
        BinaryOp::Div => Ok(Value::big_int(a / b)),
        BinaryOp::Mod if b.is_zero() => Err(modulo_by_zero()),
        BinaryOp::Mod => Ok(Value::big_int(a % b)),
        BinaryOp::Pow if b.is_negative() => {
            if a.is_zero() {
                return Err(division_by_zero());
            }
            let denominator = BigDecimal::new(big_int_pow(a, &b.abs())?, 0);
            let result = BigDecimal::one() / denominator;
            Ok(Value::big_float(result.with_prec(BIG_FLOAT_PRECISION)))
        }
        BinaryOp::Pow => Ok(Value::big_int(big_int_pow(a, b)?)),
        _ if op.is_shift() => big_int_shift(a, b, op),
        _ => Err(invalid_binary_op_for("big integers", op)),
    }
}

/// `base ** exp` for a non-negative `exp`, failing when the result would
/// exceed `MAX_BIG_BITS`.
fn big_int_pow(base: &BigInt, exp: &BigInt) -> Result<BigInt, EvalError> {
    let overflow = || integer_overflow("exponentiation");
    // 0, 1 and -1 stay one bit wide for any exponent
    if base.bits() <= 1 {
        return match exp.to_u32() {
            Some(exp) => Ok(base.pow(exp)),
            None if !exp.bit(0) => Ok(base.abs()),
            None => Ok(base.clone()),
        };
    }
    let exp = exp.to_u32().ok_or_else(overflow)?;
    if base.bits().saturating_mul(u64::from(exp)) > MAX_BIG_BITS {
        return Err(overflow());
    }
    Ok(base.pow(exp))
}

fn big_int_shift(a: &BigInt, b: &BigInt, op: BinaryOp) -> EvalResult {
    let overflow = || integer_overflow(op.operation_name());
    if b.is_negative() {
        return Err(EvalError::new(format!("negative shift count {b}")));
    }
    if op == BinaryOp::Shr {
        // shifting past the last bit leaves 0 or -1
        let shift = b.to_u64().unwrap_or(u64::MAX).min(a.bits());
        return Ok(Value::big_int(a >> shift));
    }
    if a.is_zero() {
        return Ok(Value::big_int(BigInt::zero()));
    }
    let shift = b
        .to_u64()
        .filter(|shift| a.bits().saturating_add(*shift) <= MAX_BIG_BITS)
        .ok_or_else(overflow)?;
    Ok(Value::big_int(a << shift))
}

/// Binary operations on arbitrary-precision floats.
///
/// Division keeps `BIG_FLOAT_PRECISION` significant digits. `**` takes an
/// integral exponent only.
fn eval_big_float_binary(a: &BigDecimal, b: &BigDecimal, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::big_float(a + b)),
        BinaryOp::Sub => Ok(Value::big_float(a - b)),
        BinaryOp::Mul => Ok(Value::big_float(a * b)),
        BinaryOp::Div if b.is_zero() => Err(division_by_zero()),
        BinaryOp::Div => Ok(Value::big_float((a / b).with_prec(BIG_FLOAT_PRECISION))),
        BinaryOp::Mod if b.is_zero() => Err(modulo_by_zero()),
        BinaryOp::Mod => Ok(Value::big_float(a % b)),
        BinaryOp::Pow => big_float_pow(a, b),
        _ => Err(invalid_binary_op_for("big floats", op)),
    }
}

fn big_float_pow(base: &BigDecimal, exponent: &BigDecimal) -> EvalResult {
    if !exponent.is_integer() {
        return Err(EvalError::new(format!(
            "big float exponent must be an integer, got {exponent}"
        )));
    }
    let exp = exponent
        .to_i64()
        .ok_or_else(|| integer_overflow("exponentiation"))?;
    if exp < 0 && base.is_zero() {
        return Err(division_by_zero());
    }
    // square-and-multiply, rounding each step to the working precision
    let mut result = BigDecimal::one();
    let mut square = base.clone();
    let mut remaining = exp.unsigned_abs();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = (&result * &square).with_prec(BIG_FLOAT_PRECISION);
        }
        square = (&square * &square).with_prec(BIG_FLOAT_PRECISION);
        remaining >>= 1;
    }
    if exp < 0 {
        result = (BigDecimal::one() / result).with_prec(BIG_FLOAT_PRECISION);
    }
    Ok(Value::big_float(result))
}

