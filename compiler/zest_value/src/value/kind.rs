//! Static slot kinds.
//!
//! A `Kind` is what a typed slot (variable, array element, map value, struct
//! field) declares it holds. `Kind::Any` is the boxed slot: it holds any
//! `Value` and is transparently unwrapped by the assigner.

use std::fmt;

use super::Value;

/// The declared kind of a slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// Boxed, dynamically typed slot.
    #[default]
    Any,
    Bool,
    Int,
    Int64,
    UInt,
    UInt64,
    Float,
    BigInt,
    BigFloat,
    Str,
    Array(Box<Kind>),
    /// String-keyed map with the given value kind.
    Map(Box<Kind>),
    /// Named struct (or pointer to one).
    Struct(String),
}

impl Kind {
    /// Parse a declared type string.
    ///
    /// Unknown names are taken to be struct names. A leading `*` is ignored:
    /// struct and struct-pointer slots behave the same here.
    pub fn parse(type_name: &str) -> Kind {
        let type_name = type_name.trim();
        if let Some(elem) = type_name.strip_prefix("[]") {
            return Kind::Array(Box::new(Kind::parse(elem)));
        }
        if let Some(rest) = type_name.strip_prefix("map[") {
            // map[K]V: keys are always canonicalized to strings
            let value = rest.find(']').map_or("", |close| &rest[close + 1..]);
            return Kind::Map(Box::new(Kind::parse(value)));
        }
        if let Some(pointee) = type_name.strip_prefix('*') {
            return Kind::parse(pointee);
        }
        match type_name {
            "" | "any" | "interface{}" => Kind::Any,
            "bool" => Kind::Bool,
            "int" => Kind::Int,
            "int64" => Kind::Int64,
            "uint" => Kind::UInt,
            "uint64" => Kind::UInt64,
            "float" | "float64" => Kind::Float,
            "bigint" | "bigi" => Kind::BigInt,
            "bigfloat" | "bigf" => Kind::BigFloat,
            "string" => Kind::Str,
            "map" => Kind::Map(Box::new(Kind::Any)),
            name => Kind::Struct(name.to_string()),
        }
    }

    /// The kind a value naturally has.
    ///
    /// `Nil` and anonymous structs have no kind of their own and report `Any`.
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Nil => Kind::Any,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Int64(_) => Kind::Int64,
            Value::UInt(_) => Kind::UInt,
            Value::UInt64(_) => Kind::UInt64,
            Value::Float(_) => Kind::Float,
            Value::BigInt(_) => Kind::BigInt,
            Value::BigFloat(_) => Kind::BigFloat,
            Value::Str(_) => Kind::Str,
            Value::Array(arr) => Kind::Array(Box::new(arr.elem.clone())),
            Value::Map(map) => Kind::Map(Box::new(map.elem.clone())),
            Value::Struct(s) if s.is_anonymous() => Kind::Any,
            Value::Struct(s) => Kind::Struct(s.name.clone()),
        }
    }

    /// The element kind shared by every value, or `Any` when they differ.
    pub fn common<'a>(values: impl IntoIterator<Item = &'a Value>) -> Kind {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return Kind::Any;
        };
        let kind = Kind::of(first);
        if values.all(|v| Kind::of(v) == kind) {
            kind
        } else {
            Kind::Any
        }
    }

    /// Whether `Nil` may be stored in a slot of this kind.
    pub fn is_nilable(&self) -> bool {
        matches!(
            self,
            Kind::Any | Kind::Array(_) | Kind::Map(_) | Kind::Struct(_)
        )
    }

    /// Whether this is one of the machine integer kinds.
    pub fn is_machine_int(&self) -> bool {
        matches!(self, Kind::Int | Kind::Int64 | Kind::UInt | Kind::UInt64)
    }

    /// Whether this is one of the arbitrary-precision kinds.
    pub fn is_big(&self) -> bool {
        matches!(self, Kind::BigInt | Kind::BigFloat)
    }

    /// Whether every value of this kind is a number.
    pub fn is_numeric(&self) -> bool {
        self.is_machine_int() || self.is_big() || *self == Kind::Float
    }

    /// Store-site check: may `value` be written into a slot of this kind as is?
    ///
    /// Containers are admitted when their element metadata matches or when
    /// every element is itself admitted. Anonymous structs are admitted into
    /// any struct slot.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Kind::Any, _) => true,
            (kind, Value::Nil) => kind.is_nilable(),
            (Kind::Bool, Value::Bool(_))
            | (Kind::Int, Value::Int(_))
            | (Kind::Int64, Value::Int64(_))
            | (Kind::UInt, Value::UInt(_))
            | (Kind::UInt64, Value::UInt64(_))
            | (Kind::Float, Value::Float(_))
            | (Kind::BigInt, Value::BigInt(_))
            | (Kind::BigFloat, Value::BigFloat(_))
            | (Kind::Str, Value::Str(_)) => true,
            (Kind::Array(elem), Value::Array(arr)) => {
                **elem == arr.elem || arr.items.iter().all(|item| elem.admits(item))
            }
            (Kind::Map(elem), Value::Map(map)) => {
                **elem == map.elem || map.entries.values().all(|item| elem.admits(item))
            }
            (Kind::Struct(name), Value::Struct(s)) => s.is_anonymous() || s.name == *name,
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Any => write!(f, "any"),
            Kind::Bool => write!(f, "bool"),
            Kind::Int => write!(f, "int"),
            Kind::Int64 => write!(f, "int64"),
            Kind::UInt => write!(f, "uint"),
            Kind::UInt64 => write!(f, "uint64"),
            Kind::Float => write!(f, "float64"),
            Kind::BigInt => write!(f, "bigint"),
            Kind::BigFloat => write!(f, "bigfloat"),
            Kind::Str => write!(f, "string"),
            Kind::Array(elem) => write!(f, "[]{elem}"),
            Kind::Map(elem) => write!(f, "map[string]{elem}"),
            Kind::Struct(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests;
