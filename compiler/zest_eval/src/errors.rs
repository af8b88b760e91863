//! Error constructors for assignment and operator evaluation.
//!
//! Canonical path for callers: `zest_eval::errors::*`. The definitions live
//! in `zest_value` so the value model and the registry can raise them too.

pub use zest_value::{
    ambiguous_struct_match, binary_type_mismatch, dissimilar_struct_types, division_by_zero,
    field_not_found, implicit_conversion, index_out_of_bounds, integer_overflow,
    invalid_binary_op_for, invalid_unary_op, key_not_found, modulo_by_zero, negative_count,
    negative_index, not_enough_values, syntax_error, type_mismatch, undefined_variable,
    unsupported_access_kind, ErrorCategory, EvalError, EvalErrorKind, EvalNote, EvalResult,
};
