//! Recursive assignment through access chains.
//!
//! `Assigner::assign_path` walks the remaining steps depth-first and
//! rebuilds every container it passes through instead of mutating it, so
//! aliases of the old root (`b = a` before `a[0] = 1`) never observe the
//! write. Missing containers are created on the way down (auto-vivification)
//! and short arrays grow to fit the index. The new root value is returned;
//! the binding table is only touched once the whole path has succeeded.

use zest_value::{
    dissimilar_struct_types, ensure_sufficient_stack, field_not_found, index_out_of_bounds,
    key_not_found, match_struct, negative_index, undefined_variable, unsupported_access_kind,
    EvalResult, Kind, StructRegistry, StructValue, Value,
};

use crate::chain::{AccessChain, AccessStep};
use crate::convert::{convert_to_kind, store_checked};
use crate::environment::Bindings;
use crate::eval_mode::EvalMode;

/// Copy-on-write path writer.
#[derive(Clone, Copy, Debug)]
pub struct Assigner<'a> {
    registry: &'a StructRegistry,
    mode: EvalMode,
}

impl<'a> Assigner<'a> {
    pub fn new(registry: &'a StructRegistry, mode: EvalMode) -> Self {
        Assigner { registry, mode }
    }

    /// Produce the value of a slot of kind `slot`, currently holding
    /// `current`, after storing `value` at `steps` below it.
    pub fn assign_path(
        &self,
        current: &Value,
        slot: &Kind,
        steps: &[AccessStep],
        value: Value,
    ) -> EvalResult {
        ensure_sufficient_stack(|| {
            let Some((step, rest)) = steps.split_first() else {
                let converted = convert_to_kind(value, slot, self.registry, self.mode)?;
                return store_checked(converted, slot);
            };
            tracing::trace!(step = %step, remaining = rest.len(), "assign step");
            match step {
                AccessStep::Index(index) => self.assign_index(current, slot, *index, rest, value),
                AccessStep::Key(key) => self.assign_key(current, slot, key, rest, value),
                AccessStep::Field(name) => self.assign_field(current, slot, name, rest, value),
            }
        })
    }

    fn assign_index(
        &self,
        current: &Value,
        slot: &Kind,
        index: i64,
        rest: &[AccessStep],
        value: Value,
    ) -> EvalResult {
        if matches!((current, slot), (Value::Map(_), _) | (Value::Nil, Kind::Map(_))) {
            return self.assign_key(current, slot, &index.to_string(), rest, value);
        }
        let position = usize::try_from(index).map_err(|_| negative_index(index))?;

        let (elem, old_items, old_capacity) = match current {
            Value::Array(arr) => (
                arr.elem.clone(),
                arr.items.as_slice(),
                arr.items.capacity(),
            ),
            Value::Nil => {
                let elem = match slot {
                    Kind::Array(elem) => (**elem).clone(),
                    Kind::Any => infer_kind(rest, &value),
                    other => return Err(unsupported_access_kind("index", &other.to_string())),
                };
                tracing::trace!(elem = %elem, "auto-vivify array");
                (elem, &[][..], 0)
            }
            other => return Err(unsupported_access_kind("index", other.type_name())),
        };

        let required = position + 1;
        let mut items = if required > old_items.len() {
            let capacity = required.max(old_capacity.saturating_mul(2));
            tracing::trace!(from = old_items.len(), to = required, capacity, "grow array");
            let mut grown = Vec::with_capacity(capacity);
            grown.extend_from_slice(old_items);
            grown.resize_with(required, || Value::zero_of(&elem, self.registry));
            grown
        } else {
            old_items.to_vec()
        };

        let updated = self.assign_path(&items[position], &elem, rest, value)?;
        items[position] = updated;
        Ok(Value::array(elem, items))
    }

    fn assign_key(
        &self,
        current: &Value,
        slot: &Kind,
        key: &str,
        rest: &[AccessStep],
        value: Value,
    ) -> EvalResult {
        let (elem, mut entries) = match current {
            Value::Map(map) => (map.elem.clone(), map.entries.clone()),
            Value::Nil => {
                let elem = match slot {
                    Kind::Map(elem) => (**elem).clone(),
                    Kind::Any => Kind::Any,
                    other => return Err(unsupported_access_kind("key", &other.to_string())),
                };
                tracing::trace!(elem = %elem, "auto-vivify map");
                (elem, Default::default())
            }
            other => return Err(unsupported_access_kind("key", other.type_name())),
        };

        let existing = entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| Value::zero_of(&elem, self.registry));
        let updated = self.assign_path(&existing, &elem, rest, value)?;
        entries.insert(key.to_string(), updated);
        Ok(Value::map(elem, entries))
    }

    fn assign_field(
        &self,
        current: &Value,
        slot: &Kind,
        name: &str,
        rest: &[AccessStep],
        value: Value,
    ) -> EvalResult {
        let vivified;
        let current = match (current, slot) {
            (Value::Nil, Kind::Struct(_)) => {
                vivified = Value::zero_of(slot, self.registry);
                &vivified
            }
            _ => current,
        };
        let Value::Struct(s) = current else {
            return Err(unsupported_access_kind("field", current.type_name()));
        };

        let mut copy: StructValue = (**s).clone();
        let position = copy
            .field_index(name)
            .ok_or_else(|| field_not_found(name))?;
        let field = &copy.fields[position];
        let updated = self.assign_path(&field.value, &field.kind, rest, value)?;
        copy.fields[position].value = updated;
        Ok(Value::struct_value(copy))
    }
}

/// Kind for a container created on the way to `rest`.
fn infer_kind(rest: &[AccessStep], value: &Value) -> Kind {
    match rest.first() {
        None => Kind::of(value),
        Some(AccessStep::Index(_)) => Kind::Array(Box::new(infer_kind(&rest[1..], value))),
        Some(AccessStep::Key(_)) => Kind::Map(Box::new(Kind::Any)),
        Some(AccessStep::Field(_)) => Kind::Any,
    }
}

/// Store `value` at `chain` in `bindings` and return the new root value.
///
/// An undeclared root is declared on first assignment. Whole-variable
/// writes to a variable already holding a struct must keep its field shape.
/// When the new root is a struct, its structural name is cached on the
/// binding.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(root = %chain.root, steps = chain.steps.len())
)]
pub fn assign<B: Bindings + ?Sized>(
    bindings: &mut B,
    chain: &AccessChain,
    value: Value,
    registry: &StructRegistry,
    mode: EvalMode,
) -> EvalResult {
    let (current, slot, cached) = match bindings.get_variable(&chain.root) {
        Some(var) => (
            var.value.clone(),
            var.slot_kind(),
            var.struct_kind_override.clone(),
        ),
        None => (Value::Nil, Kind::Any, None),
    };

    if chain.steps.is_empty() {
        if let (Some(_), Value::Struct(old), Value::Struct(new)) = (&cached, &current, &value) {
            if !old.same_shape(new) {
                return Err(dissimilar_struct_types(
                    &struct_label(old),
                    &struct_label(new),
                ));
            }
        }
    }

    let assigner = Assigner::new(registry, mode);
    let root = assigner.assign_path(&current, &slot, &chain.steps, value)?;

    if bindings.declare_if_absent(&chain.root) {
        tracing::trace!(name = %chain.root, "auto-declared variable");
    }
    bindings.set_variable(&chain.root, root.clone());

    if chain.steps.is_empty() || cached.is_none() {
        let kind = match &root {
            Value::Struct(s) => struct_kind_name(s, registry),
            _ => None,
        };
        if kind != cached {
            tracing::debug!(name = %chain.root, kind = ?kind, "cached struct kind");
            bindings.cache_struct_kind(&chain.root, kind);
        }
    }
    Ok(root)
}

/// Convenience wrapper over [`Assigner::assign_path`].
pub fn assign_path(
    current: &Value,
    slot: &Kind,
    steps: &[AccessStep],
    value: Value,
    registry: &StructRegistry,
    mode: EvalMode,
) -> EvalResult {
    Assigner::new(registry, mode).assign_path(current, slot, steps, value)
}

/// Read the value at `steps` below `root`.
pub fn read_path(root: &Value, steps: &[AccessStep]) -> EvalResult {
    let mut current = root;
    for step in steps {
        current = match (step, current) {
            (AccessStep::Index(index), Value::Array(arr)) => {
                let position = usize::try_from(*index).map_err(|_| negative_index(*index))?;
                arr.items
                    .get(position)
                    .ok_or_else(|| index_out_of_bounds(*index, arr.len()))?
            }
            (AccessStep::Index(index), Value::Map(map)) => map
                .entries
                .get(&index.to_string())
                .ok_or_else(|| key_not_found(&index.to_string()))?,
            (AccessStep::Key(key), Value::Map(map)) => {
                map.entries.get(key).ok_or_else(|| key_not_found(key))?
            }
            (AccessStep::Field(name), Value::Struct(s)) => {
                s.field(name).ok_or_else(|| field_not_found(name))?
            }
            (step, other) => {
                return Err(unsupported_access_kind(step.describe(), other.type_name()))
            }
        };
    }
    Ok(current.clone())
}

/// Read through the binding table.
pub fn read_variable<B: Bindings + ?Sized>(bindings: &B, chain: &AccessChain) -> EvalResult {
    let var = bindings
        .get_variable(&chain.root)
        .ok_or_else(|| undefined_variable(&chain.root))?;
    read_path(&var.value, &chain.steps)
}

/// Declared name of a struct, or its unique structural match.
///
/// Ambiguous and unknown shapes yield `None`; nothing is guessed.
pub(crate) fn struct_kind_name(s: &StructValue, registry: &StructRegistry) -> Option<String> {
    if !s.is_anonymous() {
        return Some(s.name.clone());
    }
    match match_struct(s, registry).confirmed() {
        Ok(name) => name.map(str::to_string),
        Err(err) => {
            tracing::debug!(error = %err, "struct kind left uncached");
            None
        }
    }
}

fn struct_label(s: &StructValue) -> String {
    if s.is_anonymous() {
        "struct".to_string()
    } else {
        s.name.clone()
    }
}
