//! Binding table for assignment.
//!
//! The statement executor owns frames and their lifecycle. This module only
//! provides the narrow `Bindings` interface the assigner writes through,
//! plus `Environment`, a flat table implementing it.

use rustc_hash::FxHashMap;

use zest_value::{Kind, Value};

/// A variable binding.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Variable {
    pub name: String,
    /// Set once the variable has been declared, explicitly or by first
    /// assignment.
    pub declared: bool,
    /// Statically declared type, if any.
    pub kind: Option<Kind>,
    /// Cached result of structural matching for struct values.
    pub struct_kind_override: Option<String>,
    pub value: Value,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            ..Variable::default()
        }
    }

    /// The declared kind, or `Any` for untyped variables.
    pub fn slot_kind(&self) -> Kind {
        self.kind.clone().unwrap_or(Kind::Any)
    }
}

/// Access to the variables of the current frame.
pub trait Bindings {
    fn get_variable(&self, name: &str) -> Option<&Variable>;

    /// Replace the value of a variable, declaring it if absent.
    fn set_variable(&mut self, name: &str, value: Value);

    /// Declare a variable with a `Nil` value. Returns `true` if it was absent.
    fn declare_if_absent(&mut self, name: &str) -> bool;

    /// Remember the structural kind name of the variable's struct value.
    fn cache_struct_kind(&mut self, name: &str, kind: Option<String>);
}

/// Flat binding table for a single frame.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    variables: FxHashMap<String, Variable>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a typed variable holding the zero value it is given.
    pub fn declare_typed(&mut self, name: &str, kind: Kind, zero: Value) {
        let mut var = Variable::new(name);
        var.declared = true;
        var.kind = Some(kind);
        var.value = zero;
        self.variables.insert(name.to_string(), var);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Bindings for Environment {
    fn get_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    fn set_variable(&mut self, name: &str, value: Value) {
        let var = self
            .variables
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(name));
        var.declared = true;
        var.value = value;
    }

    fn declare_if_absent(&mut self, name: &str) -> bool {
        if self.variables.contains_key(name) {
            return false;
        }
        let mut var = Variable::new(name);
        var.declared = true;
        self.variables.insert(name.to_string(), var);
        true
    }

    fn cache_struct_kind(&mut self, name: &str, kind: Option<String>) {
        if let Some(var) = self.variables.get_mut(name) {
            var.struct_kind_override = kind;
        }
    }
}
