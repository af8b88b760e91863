//! Runtime values for the Zest runtime.
//!
//! # Sharing Model
//!
//! Heap payloads live behind `Heap<T>`, whose constructor is private to this
//! module, so every allocation goes through a factory method on `Value`.
//! Cloning a `Value` shares payloads; payloads are never mutated while
//! shared. `deep_copy` is the aliasing-free copy: the result shares no
//! storage with the source at any depth, big-number digits included.

mod composite;
mod heap;
mod kind;
mod numeric;

use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;
use rustc_hash::FxHashMap;

use crate::registry::StructRegistry;
use crate::stack::ensure_sufficient_stack;

pub use composite::{ArrayValue, MapValue, StructField, StructValue};
pub use heap::Heap;
pub use kind::Kind;
pub use numeric::{format_float, BIG_FLOAT_PRECISION, MAX_BIG_BITS};

/// Runtime value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// Absent value; the zero of every nilable kind.
    #[default]
    Nil,
    Bool(bool),
    /// Platform-width signed integer.
    Int(i64),
    Int64(i64),
    /// Platform-width unsigned integer.
    UInt(u64),
    UInt64(u64),
    Float(f64),

    // Heap Types (use Heap<T> for enforced Arc usage)
    BigInt(Heap<BigInt>),
    BigFloat(Heap<BigDecimal>),
    Str(Heap<String>),
    Array(Heap<ArrayValue>),
    Map(Heap<MapValue>),
    Struct(Heap<StructValue>),
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn int64(n: i64) -> Self {
        Value::Int64(n)
    }

    #[inline]
    pub fn uint(n: u64) -> Self {
        Value::UInt(n)
    }

    #[inline]
    pub fn uint64(n: u64) -> Self {
        Value::UInt64(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn big_int(n: BigInt) -> Self {
        Value::BigInt(Heap::new(n))
    }

    #[inline]
    pub fn big_float(n: BigDecimal) -> Self {
        Value::BigFloat(Heap::new(n))
    }

    /// Create an array value.
    ///
    /// ```text
    /// let nums = Value::array(Kind::Int, vec![Value::int(1), Value::int(2)]);
    /// let mixed = Value::array(Kind::Any, vec![Value::int(1), Value::Nil]);
    /// ```
    #[inline]
    pub fn array(elem: Kind, items: Vec<Value>) -> Self {
        Value::Array(Heap::new(ArrayValue::new(elem, items)))
    }

    #[inline]
    pub fn array_value(array: ArrayValue) -> Self {
        Value::Array(Heap::new(array))
    }

    #[inline]
    pub fn map(elem: Kind, entries: FxHashMap<String, Value>) -> Self {
        Value::Map(Heap::new(MapValue::new(elem, entries)))
    }

    #[inline]
    pub fn map_value(map: MapValue) -> Self {
        Value::Map(Heap::new(map))
    }

    #[inline]
    pub fn struct_value(value: StructValue) -> Self {
        Value::Struct(Heap::new(value))
    }
}

// Value Methods

impl Value {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(arr) => Some(&**arr),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(map) => Some(&**map),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(&**s),
            _ => None,
        }
    }

    /// Short name of the value's variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Int64(_) => "int64",
            Value::UInt(_) => "uint",
            Value::UInt64(_) => "uint64",
            Value::Float(_) => "float64",
            Value::BigInt(_) => "bigint",
            Value::BigFloat(_) => "bigfloat",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
        }
    }

    /// The value's own kind. See [`Kind::of`].
    #[inline]
    pub fn kind(&self) -> Kind {
        Kind::of(self)
    }

    /// Aliasing-free copy.
    ///
    /// Arrays, maps and structs get new backing storage with every element
    /// copied recursively; big numbers get new digit storage. Element-kind
    /// metadata is preserved, including on empty containers.
    pub fn deep_copy(&self) -> Value {
        ensure_sufficient_stack(|| match self {
            Value::Nil
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Int64(_)
            | Value::UInt(_)
            | Value::UInt64(_)
            | Value::Float(_) => self.clone(),
            Value::BigInt(b) => Value::big_int((**b).clone()),
            Value::BigFloat(b) => Value::big_float((**b).clone()),
            Value::Str(s) => Value::string(s.as_str()),
            Value::Array(arr) => Value::array(
                arr.elem.clone(),
                arr.items.iter().map(Value::deep_copy).collect(),
            ),
            Value::Map(map) => Value::map(
                map.elem.clone(),
                map.entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.deep_copy()))
                    .collect(),
            ),
            Value::Struct(s) => Value::struct_value(StructValue {
                name: s.name.clone(),
                fields: s
                    .fields
                    .iter()
                    .map(|field| StructField {
                        name: field.name.clone(),
                        kind: field.kind.clone(),
                        value: field.value.deep_copy(),
                    })
                    .collect(),
            }),
        })
    }

    /// Zero value of a slot kind.
    ///
    /// Nilable kinds (boxed, array, map) are `Nil`. A registered struct kind
    /// yields a struct whose fields hold their own zero values; a struct that
    /// (directly or indirectly) contains itself gets `Nil` at the cycle.
    /// Unregistered struct names are `Nil`.
    pub fn zero_of(kind: &Kind, registry: &StructRegistry) -> Value {
        zero_with(kind, registry, &mut Vec::new())
    }

    /// Canonical map-key form of this value.
    pub fn to_key(&self) -> String {
        match self {
            Value::Str(s) => (**s).clone(),
            other => other.to_string(),
        }
    }
}

fn zero_with(kind: &Kind, registry: &StructRegistry, building: &mut Vec<String>) -> Value {
    match kind {
        Kind::Any | Kind::Array(_) | Kind::Map(_) => Value::Nil,
        Kind::Bool => Value::Bool(false),
        Kind::Int => Value::Int(0),
        Kind::Int64 => Value::Int64(0),
        Kind::UInt => Value::UInt(0),
        Kind::UInt64 => Value::UInt64(0),
        Kind::Float => Value::Float(0.0),
        Kind::BigInt => Value::big_int(BigInt::zero()),
        Kind::BigFloat => Value::big_float(BigDecimal::zero()),
        Kind::Str => Value::string(""),
        Kind::Struct(name) => {
            if building.iter().any(|b| b == name) {
                return Value::Nil;
            }
            let Some(descriptors) = registry.lookup(name) else {
                return Value::Nil;
            };
            building.push(name.clone());
            let fields = descriptors
                .iter()
                .map(|desc| {
                    let kind = Kind::parse(&desc.type_name);
                    let value = zero_with(&kind, registry, building);
                    StructField {
                        name: desc.name.clone(),
                        kind,
                        value,
                    }
                })
                .collect();
            building.pop();
            Value::struct_value(StructValue::new(name.clone(), fields))
        }
    }
}

/// Canonical spelling of a field name: first character upper-cased.
pub fn canonical_field_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) | Value::Int64(n) => write!(f, "{n}"),
            Value::UInt(n) | Value::UInt64(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::BigInt(b) => write!(f, "{}", **b),
            Value::BigFloat(b) => write!(f, "{}", b.normalized()),
            Value::Str(s) => write!(f, "{}", s.as_str()),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "map[")?;
                for (i, key) in map.sorted_keys().into_iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    if let Some(value) = map.entries.get(key) {
                        write!(f, "{key}:{value}")?;
                    }
                }
                write!(f, "]")
            }
            Value::Struct(s) => {
                write!(f, "{{")?;
                for (i, field) in s.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", field.value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
