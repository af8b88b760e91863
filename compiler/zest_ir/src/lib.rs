//! Zest IR - vocabulary shared by the value core.
//!
//! This crate contains the small set of front-end types the value core
//! consumes from the surrounding runtime:
//! - Spans for source locations
//! - Binary and unary operators
//! - Tokens for left-hand-side references
//!
//! Lexing and parsing live outside the core. The token stream here is the
//! narrow interface the access chain resolver needs: identifiers, brackets,
//! dots and commas are structural, everything else is opaque and is handed
//! back to the external evaluator.

mod operators;
mod span;
mod token;

pub use operators::{BinaryOp, UnaryOp};
pub use span::Span;
pub use token::{Token, TokenKind};
