//! Crate-level tests.
//!
//! Operator tests live here rather than inline because they span the whole
//! value set. `assign_tests` drives the assigner end to end through the
//! `Runtime` facade.

#![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

mod operators_tests;
