//! Struct registry and structural type matcher.
//!
//! The registry maps struct names to their declared fields. A struct value
//! built without a static name (an anonymous literal, a value crossing a
//! dynamic boundary) is identified by shape: a definition matches when it
//! has the same number of fields and every (name, type) pair corresponds,
//! in any order. Ambiguity is reported, never resolved by guessing.

use rustc_hash::FxHashMap;

use crate::errors::{ambiguous_struct_match, EvalError};
use crate::value::{canonical_field_name, Kind, StructValue};

/// One declared field of a registered struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Canonical field name.
    pub name: String,
    /// Declared type string, as written in the declaration.
    pub type_name: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: canonical_field_name(&name.into()),
            type_name: type_name.into(),
        }
    }

    /// Declared kind of the field.
    pub fn kind(&self) -> Kind {
        Kind::parse(&self.type_name)
    }
}

/// Registered struct definitions, iterated in registration order.
#[derive(Clone, Debug, Default)]
pub struct StructRegistry {
    definitions: Vec<(String, Vec<FieldDescriptor>)>,
    by_name: FxHashMap<String, usize>,
}

impl StructRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or redefine) a struct.
    pub fn register(&mut self, name: impl Into<String>, fields: Vec<FieldDescriptor>) {
        let name = name.into();
        if let Some(&index) = self.by_name.get(&name) {
            self.definitions[index].1 = fields;
        } else {
            self.by_name.insert(name.clone(), self.definitions.len());
            self.definitions.push((name, fields));
        }
    }

    /// Declared fields of a struct.
    pub fn lookup(&self, name: &str) -> Option<&[FieldDescriptor]> {
        self.by_name
            .get(name)
            .map(|&index| self.definitions[index].1.as_slice())
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &[FieldDescriptor])> {
        self.definitions
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }

    /// Whether `value` has exactly the declared shape of `name`.
    pub fn is_shape_of(&self, name: &str, value: &StructValue) -> bool {
        self.lookup(name)
            .is_some_and(|fields| shape_matches(value, fields))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Outcome of a structural match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructMatch {
    /// Number of registered definitions with the same shape.
    pub count: usize,
    /// First matching definition in registration order.
    pub name: Option<String>,
}

impl StructMatch {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The confirmed name: `None` when nothing matched, an error when
    /// several definitions matched.
    pub fn confirmed(&self) -> Result<Option<&str>, EvalError> {
        match self.count {
            0 => Ok(None),
            1 => Ok(self.name()),
            count => Err(ambiguous_struct_match(count)),
        }
    }
}

/// Find the registered definitions whose shape equals the value's.
pub fn match_struct(value: &StructValue, registry: &StructRegistry) -> StructMatch {
    let mut result = StructMatch {
        count: 0,
        name: None,
    };
    for (name, fields) in registry.definitions() {
        if shape_matches(value, fields) {
            result.count += 1;
            if result.name.is_none() {
                result.name = Some(name.to_string());
            }
        }
    }
    if result.count > 1 {
        tracing::debug!(count = result.count, "ambiguous struct match");
    }
    result
}

/// Pairs every value field with a distinct descriptor of the same name and
/// kind.
fn shape_matches(value: &StructValue, fields: &[FieldDescriptor]) -> bool {
    if value.fields.len() != fields.len() {
        return false;
    }
    let mut paired = vec![false; fields.len()];
    value.fields.iter().all(|field| {
        let slot = fields.iter().zip(&paired).position(|(desc, taken)| {
            !*taken && desc.name == field.name && desc.kind() == field.kind
        });
        match slot {
            Some(index) => {
                paired[index] = true;
                true
            }
            None => false,
        }
    })
}
