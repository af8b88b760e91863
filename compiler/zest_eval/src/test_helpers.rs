//! Shared helpers for the crate's tests.
//!
//! `lex` is a throwaway tokenizer for left-hand-side strings such as
//! `user["roles"][2].name`. `LiteralEval` stands in for the expression
//! evaluator: it understands integer and string literals and looks up
//! plain identifiers in a small table.

#![allow(clippy::unwrap_used, reason = "test helpers panic on malformed input")]

use rustc_hash::FxHashMap;
use zest_ir::{Span, Token, TokenKind};
use zest_value::{syntax_error, undefined_variable, EvalResult, Value};

use crate::chain::Eval;

/// Tokenize a left-hand-side string.
pub(crate) fn lex(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];
        let kind = match c {
            b' ' | b'\t' => {
                pos += 1;
                continue;
            }
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'.' => TokenKind::Dot,
            b',' => TokenKind::Comma,
            b'"' => {
                pos += 1;
                while bytes[pos] != b'"' {
                    pos += 1;
                }
                TokenKind::Literal
            }
            b'0'..=b'9' => {
                while pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit() {
                    pos += 1;
                }
                TokenKind::Literal
            }
            c if c == b'_' || c.is_ascii_alphabetic() => {
                while pos + 1 < bytes.len()
                    && (bytes[pos + 1] == b'_' || bytes[pos + 1].is_ascii_alphanumeric())
                {
                    pos += 1;
                }
                TokenKind::Ident
            }
            _ => TokenKind::Operator,
        };
        pos += 1;
        let span = Span::new(u32::try_from(start).unwrap(), u32::try_from(pos).unwrap());
        tokens.push(Token::new(kind, &source[start..pos], span));
    }
    tokens
}

/// Literal-only expression evaluator with optional identifier lookups.
#[derive(Default)]
pub(crate) struct LiteralEval {
    pub names: FxHashMap<String, Value>,
    /// Number of sub-expressions evaluated so far.
    pub calls: usize,
}

impl LiteralEval {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.names.insert(name.to_string(), value);
        self
    }
}

impl Eval for LiteralEval {
    fn eval(&mut self, tokens: &[Token]) -> EvalResult {
        self.calls += 1;
        let [tok] = tokens else {
            return Err(syntax_error("only single-token expressions are supported"));
        };
        match tok.kind {
            TokenKind::Literal if tok.text.starts_with('"') => {
                Ok(Value::string(tok.text.trim_matches('"')))
            }
            TokenKind::Literal => tok
                .text
                .parse::<i64>()
                .map(Value::int)
                .map_err(|_| syntax_error(format!("bad literal `{}`", tok.text))),
            TokenKind::Ident => self
                .names
                .get(&tok.text)
                .cloned()
                .ok_or_else(|| undefined_variable(&tok.text)),
            _ => Err(syntax_error(format!("unexpected `{}`", tok.text))),
        }
    }
}
