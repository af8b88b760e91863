//! Binary and unary operators.
//!
//! All types are `Copy` and hashable so they can key dispatch tables and
//! appear in structured error kinds.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Shift
    Shl,
    Shr,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            // Arithmetic
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            // Shift
            Self::Shl => "<<",
            Self::Shr => ">>",
            // Comparison
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }

    /// Human-readable name of the operation, for overflow messages.
    pub const fn operation_name(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Sub => "subtraction",
            Self::Mul => "multiplication",
            Self::Div => "division",
            Self::Mod => "remainder",
            Self::Pow => "exponentiation",
            Self::Shl => "left shift",
            Self::Shr => "right shift",
            Self::Eq | Self::NotEq => "equality",
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => "comparison",
        }
    }

    /// `<`, `<=`, `>`, `>=`.
    #[inline]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::LtEq | Self::Gt | Self::GtEq)
    }

    /// `==`, `!=`.
    #[inline]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::NotEq)
    }

    /// `<<`, `>>`.
    #[inline]
    pub const fn is_shift(self) -> bool {
        matches!(self, Self::Shl | Self::Shr)
    }

    /// Operators that broadcast a scalar across a numeric array.
    #[inline]
    pub const fn broadcasts(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Numeric normalization (`+x`).
    Plus,
    /// Numeric negation (`-x`).
    Neg,
    /// Boolean negation (`!x`).
    Not,
}

impl UnaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(BinaryOp::Pow.as_symbol(), "**");
        assert_eq!(BinaryOp::Shr.as_symbol(), ">>");
        assert_eq!(UnaryOp::Not.as_symbol(), "!");
    }

    #[test]
    fn test_classification() {
        assert!(BinaryOp::LtEq.is_ordering());
        assert!(!BinaryOp::Eq.is_ordering());
        assert!(BinaryOp::NotEq.is_equality());
        assert!(BinaryOp::Shl.is_shift());
        assert!(BinaryOp::Div.broadcasts());
        assert!(!BinaryOp::Mod.broadcasts());
    }
}
