//! Access chain resolution.
//!
//! A left-hand side is a root identifier followed by any mix of `[expr]`
//! and `.field` suffixes. Resolution evaluates each bracketed expression
//! exactly once, left to right, through the caller's `Eval`, and classifies
//! the step by the result: machine integers become `Index`, anything else is
//! canonicalized to its key string and becomes `Key`. Field names are stored
//! in canonical form.
//!
//! Any failure aborts the whole chain; no partial chain is returned.

use std::fmt;

use smallvec::SmallVec;
use zest_ir::{Span, Token, TokenKind};
use zest_value::{canonical_field_name, syntax_error, EvalError, EvalResult, Value};

/// External expression evaluator for index and key sub-expressions.
pub trait Eval {
    fn eval(&mut self, tokens: &[Token]) -> EvalResult;
}

impl<F> Eval for F
where
    F: FnMut(&[Token]) -> EvalResult,
{
    fn eval(&mut self, tokens: &[Token]) -> EvalResult {
        self(tokens)
    }
}

/// One step of an access path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessStep {
    /// Array position.
    Index(i64),
    /// Canonical map key.
    Key(String),
    /// Canonical struct field name.
    Field(String),
}

impl AccessStep {
    /// Short description used in access errors.
    pub fn describe(&self) -> &'static str {
        match self {
            AccessStep::Index(_) => "index",
            AccessStep::Key(_) => "key",
            AccessStep::Field(_) => "field",
        }
    }
}

impl fmt::Display for AccessStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessStep::Index(i) => write!(f, "[{i}]"),
            AccessStep::Key(k) => write!(f, "[{k:?}]"),
            AccessStep::Field(name) => write!(f, ".{name}"),
        }
    }
}

/// A resolved left-hand-side reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessChain {
    /// Name of the root variable.
    pub root: String,
    pub steps: SmallVec<[AccessStep; 4]>,
    pub span: Span,
}

impl AccessChain {
    /// A chain naming a whole variable.
    pub fn variable(root: impl Into<String>) -> Self {
        AccessChain {
            root: root.into(),
            steps: SmallVec::new(),
            span: Span::DUMMY,
        }
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: AccessStep) -> Self {
        self.steps.push(step);
        self
    }
}

impl fmt::Display for AccessChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// One target of a (possibly multi-target) assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignTarget {
    Chain(AccessChain),
    /// `_`: the value is evaluated but not stored.
    Discard,
}

/// Resolve a single left-hand-side reference.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn resolve_chain(tokens: &[Token], eval: &mut dyn Eval) -> Result<AccessChain, EvalError> {
    let Some((head, mut rest)) = tokens.split_first() else {
        return Err(syntax_error("empty assignment target"));
    };
    if !head.is(TokenKind::Ident) {
        return Err(syntax_error(format!(
            "assignment target must start with an identifier, not `{}`",
            head.text
        ))
        .with_span(head.span));
    }

    let mut chain = AccessChain {
        root: head.text.clone(),
        steps: SmallVec::new(),
        span: head.span,
    };

    while let Some((tok, after)) = rest.split_first() {
        match tok.kind {
            TokenKind::LBracket => {
                let close = matching_bracket(after).ok_or_else(|| {
                    syntax_error("unmatched `[` in assignment target").with_span(tok.span)
                })?;
                let inner = &after[..close];
                if inner.is_empty() {
                    return Err(syntax_error("empty index in assignment target").with_span(tok.span));
                }
                let key = eval.eval(inner)?;
                chain.steps.push(classify(&key));
                chain.span = chain.span.merge(after[close].span);
                rest = &after[close + 1..];
            }
            TokenKind::Dot => {
                let Some((name, after_name)) = after
                    .split_first()
                    .filter(|(name, _)| name.is(TokenKind::Ident))
                else {
                    return Err(syntax_error("expected field name after `.`").with_span(tok.span));
                };
                chain.steps.push(AccessStep::Field(canonical_field_name(&name.text)));
                chain.span = chain.span.merge(name.span);
                rest = after_name;
            }
            _ => {
                return Err(syntax_error(format!(
                    "unexpected `{}` in assignment target",
                    tok.text
                ))
                .with_span(tok.span));
            }
        }
    }

    tracing::debug!(chain = %chain, "resolved access chain");
    Ok(chain)
}

/// Resolve a comma-separated list of targets.
///
/// Commas nested inside brackets or parentheses belong to index
/// expressions, not to the target list. A lone `_` is a discard.
pub fn resolve_targets(
    tokens: &[Token],
    eval: &mut dyn Eval,
) -> Result<Vec<AssignTarget>, EvalError> {
    let mut targets = Vec::new();
    for part in split_top_level(tokens) {
        match part {
            [] => return Err(syntax_error("empty assignment target")),
            [only] if only.is(TokenKind::Ident) && only.text == "_" => {
                targets.push(AssignTarget::Discard);
            }
            _ => targets.push(AssignTarget::Chain(resolve_chain(part, eval)?)),
        }
    }
    Ok(targets)
}

/// Index of the `]` closing a bracket whose contents start at `tokens[0]`.
fn matching_bracket(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind.opens_group() {
            depth += 1;
        } else if tok.kind.closes_group() {
            if depth == 0 {
                return tok.is(TokenKind::RBracket).then_some(i);
            }
            depth -= 1;
        }
    }
    None
}

fn split_top_level(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind.opens_group() {
            depth += 1;
        } else if tok.kind.closes_group() {
            depth = depth.saturating_sub(1);
        } else if tok.is(TokenKind::Comma) && depth == 0 {
            parts.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Machine integers that fit `i64` index; everything else keys.
fn classify(key: &Value) -> AccessStep {
    match key.as_i64() {
        Some(index) if key.is_machine_int() => AccessStep::Index(index),
        _ => AccessStep::Key(key.to_key()),
    }
}
