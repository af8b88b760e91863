//! Evaluation modes.
//!
//! Parameterizes assignment and operator evaluation via an `EvalMode` enum.
//! Each variant answers policy questions through methods, so call sites
//! never match on the mode directly.

/// Evaluation mode, determines how lenient conversions are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Values the conversion policy cannot convert pass through unchanged
    /// and are checked at the store site. Strings absorb numbers and bools
    /// in `+` silently.
    #[default]
    Permissive,
    /// Conversion failures are raised immediately, and implicit
    /// number-to-string concatenation is reported as a warning-class error.
    Strict,
}

impl EvalMode {
    /// Whether an unconvertible value may pass through to the store site.
    #[inline]
    pub fn allows_passthrough(self) -> bool {
        matches!(self, Self::Permissive)
    }

    /// Whether `"a" + 1` style concatenation is accepted silently.
    #[inline]
    pub fn allows_implicit_string_conversion(self) -> bool {
        matches!(self, Self::Permissive)
    }
}
