#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental, boxing would add complexity across the crate"
)]
//! Zest Value - runtime values for the Zest language.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `Heap`, `ArrayValue`, `MapValue`, `StructValue`)
//! - Static slot kinds (`Kind`) parsed from declared type strings
//! - Evaluation error types (`EvalError`, `EvalErrorKind`, `EvalResult`)
//! - The struct registry and structural type matcher
//!
//! # Value Types
//!
//! All heap allocations go through `Value::` factory methods. Values share
//! storage through `Heap<T>` on clone and never mutate shared storage, so an
//! alias can only be changed by rebinding. `Value::deep_copy` produces a value
//! with no shared storage at all.

mod errors;
mod registry;
mod stack;
mod value;

pub use errors::{
    ambiguous_struct_match, binary_type_mismatch, dissimilar_struct_types, division_by_zero,
    field_not_found, implicit_conversion, index_out_of_bounds, integer_overflow,
    invalid_binary_op_for, invalid_unary_op, key_not_found, modulo_by_zero, negative_count,
    negative_index, not_enough_values, syntax_error, type_mismatch, undefined_variable,
    unsupported_access_kind, ErrorCategory, EvalError, EvalErrorKind, EvalNote, EvalResult,
};
pub use registry::{match_struct, FieldDescriptor, StructMatch, StructRegistry};
pub use stack::ensure_sufficient_stack;
pub use value::{
    canonical_field_name, format_float, ArrayValue, Heap, Kind, MapValue, StructField,
    StructValue, Value, BIG_FLOAT_PRECISION, MAX_BIG_BITS,
};

// Re-export the arbitrary-precision types so callers agree on one version.
pub use bigdecimal::BigDecimal;
pub use num_bigint::BigInt;
