#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental, boxing would add complexity across the crate"
)]
//! Zest Eval - assignment and operator evaluation for the Zest runtime.
//!
//! # Architecture
//!
//! - `resolve_chain`: turns a left-hand-side token stream into an `AccessChain`
//! - `assign`: walks a chain depth-first, copy-on-write at every level
//! - `convert_to_kind`: the base-case conversion policy for typed slots
//! - `evaluate_binary` / `evaluate_unary`: enum-dispatched operators over one
//!   numeric coercion lattice
//! - `deep_equal` / `compare_values`: equality and ordering
//! - `Environment`: the binding table, behind the `Bindings` trait
//! - `Runtime`: facade tying these together with an `EvalMode` and a shared
//!   `StructRegistry`
//!
//! # Re-exports
//!
//! Value and error types come from `zest_value` and are re-exported here.

mod assign;
mod chain;
mod compare;
mod convert;
mod environment;
pub mod errors;
mod eval_mode;
mod operators;
mod runtime;
mod shared;
mod unary_operators;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;

use std::sync::Once;

pub use zest_value::{
    ensure_sufficient_stack, match_struct, ArrayValue, ErrorCategory, EvalError, EvalErrorKind,
    EvalResult, FieldDescriptor, Heap, Kind, MapValue, StructField, StructMatch, StructRegistry,
    StructValue, Value,
};

pub use assign::{assign, assign_path, read_path, read_variable, Assigner};
pub use chain::{resolve_chain, resolve_targets, AccessChain, AccessStep, AssignTarget, Eval};
pub use compare::{compare_values, deep_equal};
pub use convert::{convert_to_kind, store_checked};
pub use environment::{Bindings, Environment, Variable};
pub use eval_mode::EvalMode;
pub use operators::evaluate_binary;
pub use runtime::{Runtime, RuntimeBuilder};
pub use shared::SharedMutableRegistry;
pub use unary_operators::evaluate_unary;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Nothing is installed unless `RUST_LOG` is
/// set, e.g. `RUST_LOG=zest_eval=trace` to follow every assigner step.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
