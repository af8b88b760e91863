//! `Runtime` facade and its builder.
//!
//! Ties the binding table, the shared struct registry and the evaluation
//! mode together for callers that do not want to thread them through every
//! call.

use zest_ir::{BinaryOp, Token, UnaryOp};
use zest_value::{
    match_struct, not_enough_values, undefined_variable, EvalError, EvalResult, Kind,
    StructRegistry, Value,
};

use crate::assign::{assign, read_variable, struct_kind_name};
use crate::chain::{resolve_chain, AccessChain, AssignTarget, Eval};
use crate::environment::{Bindings, Environment};
use crate::eval_mode::EvalMode;
use crate::operators::evaluate_binary;
use crate::shared::SharedMutableRegistry;
use crate::unary_operators::evaluate_unary;

/// Builder for `Runtime`.
///
/// Defaults: `EvalMode::Permissive`, an empty registry, an empty
/// environment.
#[derive(Default)]
pub struct RuntimeBuilder {
    mode: EvalMode,
    registry: Option<SharedMutableRegistry<StructRegistry>>,
    env: Option<Environment>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation mode.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Share a struct registry with the declaration subsystem.
    #[must_use]
    pub fn registry(mut self, registry: SharedMutableRegistry<StructRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Start from an existing binding table.
    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn build(self) -> Runtime {
        Runtime {
            mode: self.mode,
            registry: self.registry.unwrap_or_default(),
            env: self.env.unwrap_or_default(),
        }
    }
}

/// Assignment and operator evaluation over one binding table.
#[derive(Debug, Default)]
pub struct Runtime {
    mode: EvalMode,
    registry: SharedMutableRegistry<StructRegistry>,
    env: Environment,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn registry(&self) -> &SharedMutableRegistry<StructRegistry> {
        &self.registry
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Declare a typed variable holding its kind's zero value.
    pub fn declare(&mut self, name: &str, kind: Kind) {
        let zero = Value::zero_of(&kind, &self.registry.read());
        self.env.declare_typed(name, kind, zero);
    }

    /// Store `value` at `chain`, returning the new root value.
    #[tracing::instrument(level = "debug", skip_all, fields(chain = %chain))]
    pub fn assign(&mut self, chain: &AccessChain, value: Value) -> EvalResult {
        let registry = self.registry.read();
        assign(&mut self.env, chain, value, &registry, self.mode)
    }

    /// Resolve a left-hand side from tokens and store `value` there.
    pub fn assign_tokens(
        &mut self,
        tokens: &[Token],
        value: Value,
        eval: &mut dyn Eval,
    ) -> EvalResult {
        let chain = resolve_chain(tokens, eval)?;
        self.assign(&chain, value)
    }

    /// Multi-target assignment.
    ///
    /// A single value goes to the first target only. More targets than
    /// values fails before anything is written, unless there is just one
    /// value. Surplus values are ignored and `_` targets are skipped.
    pub fn assign_all(
        &mut self,
        targets: &[AssignTarget],
        values: Vec<Value>,
    ) -> Result<(), EvalError> {
        if targets.len() > values.len() && values.len() > 1 {
            return Err(not_enough_values());
        }
        for (target, value) in targets.iter().zip(values) {
            if let AssignTarget::Chain(chain) = target {
                self.assign(chain, value)?;
            }
        }
        Ok(())
    }

    /// Read the value at `chain`.
    pub fn read(&self, chain: &AccessChain) -> EvalResult {
        read_variable(&self.env, chain)
    }

    pub fn binary(&self, left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
        evaluate_binary(left, right, op, self.mode)
    }

    pub fn unary(&self, value: &Value, op: UnaryOp) -> EvalResult {
        evaluate_unary(value, op)
    }

    /// Struct kind name of a variable's value.
    ///
    /// Uses the cached name when present; otherwise runs structural
    /// matching once and caches a unique result. Ambiguous shapes fail.
    pub fn struct_name_of(&mut self, name: &str) -> Result<Option<String>, EvalError> {
        let var = self
            .env
            .get_variable(name)
            .ok_or_else(|| undefined_variable(name))?;
        if let Some(cached) = &var.struct_kind_override {
            return Ok(Some(cached.clone()));
        }
        let Value::Struct(s) = &var.value else {
            return Ok(None);
        };
        let registry = self.registry.read();
        if s.is_anonymous() {
            // surface ambiguity instead of quietly returning None
            match_struct(s, &registry).confirmed()?;
        }
        let kind = struct_kind_name(s, &registry);
        drop(registry);
        self.env.cache_struct_kind(name, kind.clone());
        Ok(kind)
    }
}
