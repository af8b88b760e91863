//! Numeric promotion helpers for the coercion lattice.
//!
//! Every promotion builds a fresh arbitrary-precision number; nothing here
//! hands out storage owned by the source value.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

use super::Value;

/// Decimal digits kept by arbitrary-precision float division and promotion.
pub const BIG_FLOAT_PRECISION: u64 = 64;

/// Largest arbitrary-precision integer result, in bits.
pub const MAX_BIG_BITS: u64 = 1 << 24;

/// Shortest decimal form of a float that reads back to the same value,
/// never in exponent notation.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        format!("{f}")
    }
}

impl Value {
    /// Whether this is one of the machine integer variants.
    #[inline]
    pub fn is_machine_int(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Int64(_) | Value::UInt(_) | Value::UInt64(_)
        )
    }

    /// Whether this is any integer or float, machine or arbitrary precision.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.is_machine_int()
            || matches!(self, Value::Float(_) | Value::BigInt(_) | Value::BigFloat(_))
    }

    /// Machine integer widened to `i128`, which holds every `i64` and `u64`.
    #[inline]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(n) | Value::Int64(n) => Some(i128::from(*n)),
            Value::UInt(n) | Value::UInt64(n) => Some(i128::from(*n)),
            _ => None,
        }
    }

    /// Machine integer as `i64`, if it fits.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|n| i64::try_from(n).ok())
    }

    /// Numeric value as a float (lossy for large integers).
    #[allow(
        clippy::cast_precision_loss,
        reason = "integer to float promotion is lossy by definition"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::BigInt(b) => b.to_f64(),
            Value::BigFloat(b) => b.to_f64(),
            other => other.as_i128().map(|n| n as f64),
        }
    }

    /// Promote to a fresh arbitrary-precision integer.
    ///
    /// Floats truncate toward zero; non-finite floats have no integer form.
    pub fn to_big_int(&self) -> Option<BigInt> {
        match self {
            Value::BigInt(b) => Some((**b).clone()),
            Value::BigFloat(b) => Some(truncate_big_float(b)),
            Value::Float(f) if f.is_finite() => BigInt::from_f64(f.trunc()),
            other => other.as_i128().map(BigInt::from),
        }
    }

    /// Promote to a fresh arbitrary-precision float.
    pub fn to_big_float(&self) -> Option<BigDecimal> {
        match self {
            Value::BigFloat(b) => Some((**b).clone()),
            Value::BigInt(b) => Some(BigDecimal::new((**b).clone(), 0)),
            Value::Float(f) if f.is_finite() => {
                BigDecimal::from_f64(*f).map(|d| d.with_prec(BIG_FLOAT_PRECISION))
            }
            other => other
                .as_i128()
                .map(|n| BigDecimal::new(BigInt::from(n), 0)),
        }
    }
}

/// Integer part of a big float, truncated toward zero.
pub(crate) fn truncate_big_float(value: &BigDecimal) -> BigInt {
    let (digits, scale) = value.with_scale(0).into_bigint_and_exponent();
    debug_assert_eq!(scale, 0);
    digits
}
