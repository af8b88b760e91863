//! Composite value payloads: arrays, maps and structs.

use rustc_hash::FxHashMap;

use super::{Kind, Value};

/// Array payload.
///
/// `elem` is the declared element kind. `Kind::Any` marks a heterogeneous
/// array of boxed values; any other kind means every element has that kind.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ArrayValue {
    pub elem: Kind,
    pub items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(elem: Kind, items: Vec<Value>) -> Self {
        ArrayValue { elem, items }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Map payload. Keys are canonical strings.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MapValue {
    pub elem: Kind,
    pub entries: FxHashMap<String, Value>,
}

impl MapValue {
    pub fn new(elem: Kind, entries: FxHashMap<String, Value>) -> Self {
        MapValue { elem, entries }
    }

    /// Keys in sorted order, for deterministic iteration.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// One struct field: canonical name, declared kind and current value.
#[derive(Clone, Debug, PartialEq)]
pub struct StructField {
    pub name: String,
    pub kind: Kind,
    pub value: Value,
}

impl StructField {
    pub fn new(name: impl Into<String>, kind: Kind, value: Value) -> Self {
        StructField {
            name: super::canonical_field_name(&name.into()),
            kind,
            value,
        }
    }
}

/// Struct payload.
///
/// An empty `name` marks an anonymous struct whose type is only known by
/// shape. Field order is declaration order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StructValue {
    pub name: String,
    pub fields: Vec<StructField>,
}

impl StructValue {
    pub fn new(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        StructValue {
            name: name.into(),
            fields,
        }
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Position of the field with this canonical name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Value of the field with this canonical name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Field names with their declared kinds, sorted by name.
    pub fn shape(&self) -> Vec<(&str, &Kind)> {
        let mut shape: Vec<(&str, &Kind)> = self
            .fields
            .iter()
            .map(|f| (f.name.as_str(), &f.kind))
            .collect();
        shape.sort_unstable_by(|a, b| a.0.cmp(b.0));
        shape
    }

    /// Same field names and kinds, ignoring order.
    pub fn same_shape(&self, other: &StructValue) -> bool {
        self.shape() == other.shape()
    }
}
