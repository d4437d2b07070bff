//! # jsc-core — Foundational Types for Schema Compatibility
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Keywords are parsed once.** [`SchemaNode`] turns a JSON Schema
//!    document into explicit optional fields. Comparison rules read typed
//!    fields; they never re-interrogate raw JSON for presence.
//!
//! 2. **Negative verdicts are data.** A failed subset check produces a
//!    [`CompatErrorList`], a non-empty ordered trace. Only caller mistakes
//!    become [`UsageError`].
//!
//! 3. **Paths are immutable.** [`PathPair`] values are extended by copy on
//!    every descent, so a trace record always names where it was produced.
//!
//! 4. **Exact `multipleOf`.** [`Decimal`] decides divisibility on the
//!    decimal text of JSON numbers, not on binary floating point.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod decimal;
pub mod error;
pub mod path;
pub mod schema;

// Re-export primary types for ergonomic imports.
pub use decimal::Decimal;
pub use error::{CompatError, CompatErrorList, Operand, Outcome, UsageError};
pub use path::{PathKey, PathPair};
pub use schema::{check_depth, AdditionalProperties, Items, SchemaNode, TypeName, TypeSet, DEFAULT_MAX_DEPTH};
