//! Error types for value operations.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the structured data of each failure. Factory
//! functions (e.g. `division_by_zero()`) are the public way to build errors;
//! they populate both `kind` and the rendered `message`.
//!
//! `ErrorCategory` groups kinds into the coarse taxonomy callers dispatch on:
//! syntax, propagated evaluation failures, type, index, field, divide by
//! zero and ambiguous struct matches.

use std::fmt;

use zest_ir::{BinaryOp, Span, UnaryOp};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Coarse error taxonomy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Syntax,
    /// Failures reported by the external evaluator, passed through as is.
    Eval,
    Type,
    Index,
    Field,
    DivideByZero,
    AmbiguousStruct,
}

/// Typed error kind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    // Type/Operator
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    #[error("operator `{}` cannot be applied to {type_name}", .op.as_symbol())]
    InvalidBinaryOp { type_name: String, op: BinaryOp },
    #[error("cannot apply `{}` to `{left}` and `{right}`", .op.as_symbol())]
    BinaryTypeMismatch {
        op: BinaryOp,
        left: String,
        right: String,
    },
    #[error("operator `{}` cannot be applied to {type_name}", .op.as_symbol())]
    InvalidUnaryOp { type_name: String, op: UnaryOp },
    /// Warning class: a non-string operand was implicitly formatted.
    #[error("implicit conversion of {type_name} to string")]
    ImplicitConversion { type_name: String },

    // Syntax
    #[error("syntax error: {message}")]
    Syntax { message: String },

    // Access
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("negative index {index}")]
    NegativeIndex { index: i64 },
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
    #[error("no field {field} on struct")]
    FieldNotFound { field: String },
    #[error("cannot apply {step} access to {container}")]
    UnsupportedAccessKind { step: String, container: String },
    #[error("ambiguous struct match: {count} registered types have this shape")]
    AmbiguousStructMatch { count: usize },

    /// Catch-all, also used for errors raised by the external evaluator.
    #[error("{message}")]
    Custom { message: String },
}

impl EvalErrorKind {
    /// The taxonomy bucket this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DivisionByZero | Self::ModuloByZero => ErrorCategory::DivideByZero,
            Self::IntegerOverflow { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidBinaryOp { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::InvalidUnaryOp { .. }
            | Self::ImplicitConversion { .. }
            | Self::UnsupportedAccessKind { .. } => ErrorCategory::Type,
            Self::Syntax { .. } => ErrorCategory::Syntax,
            Self::NegativeIndex { .. }
            | Self::IndexOutOfBounds { .. }
            | Self::KeyNotFound { .. } => ErrorCategory::Index,
            Self::FieldNotFound { .. } => ErrorCategory::Field,
            Self::AmbiguousStructMatch { .. } => ErrorCategory::AmbiguousStruct,
            Self::UndefinedVariable { .. } | Self::Custom { .. } => ErrorCategory::Eval,
        }
    }
}

/// Additional context note attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    /// Create a note with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    /// Create a note with a message and source location.
    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error kind.
    pub kind: EvalErrorKind,
    /// Human-readable error message. For factory-created errors this
    /// equals `kind.to_string()`.
    pub message: String,
    /// Source location where the error occurred.
    pub span: Option<Span>,
    /// Additional context notes.
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the factory functions when a structured
    /// kind is available.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attach a source span to this error.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Add a context note to this error.
    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Warning-class errors report a suspicious but well-defined operation.
    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, EvalErrorKind::ImplicitConversion { .. })
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {}", note.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Arithmetic Errors

/// Division by zero error.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Modulo by zero error.
#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

/// Integer overflow error.
#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

/// Negative repetition count in `*`.
#[cold]
pub fn negative_count(count: i128) -> EvalError {
    EvalError::new(format!("negative repeat count: {count}"))
}

// Type and Operator Errors

/// Value cannot be stored in a slot of the expected kind.
#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// Struct reassigned with a value of a different field shape.
#[cold]
pub fn dissimilar_struct_types(expected: &str, got: &str) -> EvalError {
    type_mismatch(expected, got).with_note(EvalNote::new("dissimilar struct types"))
}

/// Invalid operator for a specific type.
#[cold]
pub fn invalid_binary_op_for(type_name: &str, op: BinaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        type_name: type_name.to_string(),
        op,
    })
}

/// Type mismatch in binary operation.
#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// Invalid unary operator for a type.
#[cold]
pub fn invalid_unary_op(type_name: &str, op: UnaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        type_name: type_name.to_string(),
        op,
    })
}

/// Implicit number/bool to string conversion (warning class).
#[cold]
pub fn implicit_conversion(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImplicitConversion {
        type_name: type_name.to_string(),
    })
}

// Syntax Errors

/// Malformed reference.
#[cold]
pub fn syntax_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Syntax {
        message: message.into(),
    })
}

/// More assignment targets than values.
#[cold]
pub fn not_enough_values() -> EvalError {
    syntax_error("not enough values to populate assignment")
}

// Access Errors

/// Undefined variable.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// Negative array index.
#[cold]
pub fn negative_index(index: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NegativeIndex { index })
}

/// Index out of bounds on read.
#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

/// Key not found in map.
#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

/// No field on struct.
#[cold]
pub fn field_not_found(field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FieldNotFound {
        field: field.to_string(),
    })
}

/// Access step does not fit the container it is applied to.
#[cold]
pub fn unsupported_access_kind(step: &str, container: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedAccessKind {
        step: step.to_string(),
        container: container.to_string(),
    })
}

/// Several registered structs share a value's shape.
#[cold]
pub fn ambiguous_struct_match(count: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AmbiguousStructMatch { count })
}

#[cfg(test)]
mod tests;
