//! Tokens for left-hand-side references.
//!
//! The resolver only cares about structure (identifiers, brackets, dots,
//! commas and grouping). Literals and operators inside index expressions are
//! carried through untouched for the external evaluator.

use crate::Span;

/// Token classification.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Identifier (`user`, `name`, `_`).
    Ident,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// Integer, float or string literal.
    Literal,
    /// Any operator symbol.
    Operator,
}

impl TokenKind {
    /// Opening delimiters that increase nesting depth.
    #[inline]
    pub const fn opens_group(self) -> bool {
        matches!(self, Self::LBracket | Self::LParen | Self::LBrace)
    }

    /// Closing delimiters that decrease nesting depth.
    #[inline]
    pub const fn closes_group(self) -> bool {
        matches!(self, Self::RBracket | Self::RParen | Self::RBrace)
    }
}

/// A single token with its source text.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Create an identifier token without a source location.
    pub fn ident(name: impl Into<String>) -> Self {
        Token::new(TokenKind::Ident, name, Span::DUMMY)
    }

    /// Check whether this token is of the given kind.
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
