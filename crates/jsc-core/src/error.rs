//! # Error Types — Usage Errors and Compatibility Traces
//!
//! Two categories of failure leave the comparator:
//!
//! - **Usage errors** ([`UsageError`]) — the caller handed us something we
//!   refuse to reason about: a pre-draft-5 dialect, a malformed top-level
//!   schema, a dangling or cyclic `$ref`. These abort the call as `Err`.
//! - **Compatibility failures** ([`CompatErrorList`]) — the expected
//!   negative verdict. They are plain data, never `Err`, and carry an
//!   ordered trace of `(path pair, message)` records.
//!
//! ## Trace Ordering
//!
//! The trace is ordered deepest cause first. Every enclosing frame that
//! propagates a failure appends exactly one summarizing entry, so the last
//! record always describes the root comparison.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::path::PathPair;

/// Which operand of a subset check an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operand {
    /// The candidate (narrower) schema.
    Input,
    /// The schema the input must imply.
    Target,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Caller errors. Never used to signal "not a subset".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    /// The operand declares a dialect older than draft 5.
    #[error("{operand} schema declares unsupported dialect '{dialect}': requires JSON Schema draft version 5+")]
    UnsupportedDialect {
        /// Offending operand.
        operand: Operand,
        /// The `$schema` value found.
        dialect: String,
    },

    /// The operand is not a usable top-level schema.
    #[error("{operand} schema is malformed: {reason}")]
    MalformedSchema {
        /// Offending operand.
        operand: Operand,
        /// What is wrong with it.
        reason: String,
    },

    /// A keyword carries a value of the wrong shape.
    #[error("invalid '{keyword}' keyword: {reason}")]
    InvalidKeyword {
        /// Keyword name, e.g. `exclusiveMaximum`.
        keyword: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A `$ref` points at nothing we can resolve.
    #[error("unresolved reference '{reference}'")]
    UnresolvedReference {
        /// The `$ref` string.
        reference: String,
    },

    /// A `$ref` chain leads back to itself.
    #[error("cyclic reference '{reference}' cannot be inlined")]
    CyclicReference {
        /// The `$ref` string that closed the cycle.
        reference: String,
    },

    /// Schema nesting exceeds the configured limit.
    #[error("schema nesting exceeds the maximum depth of {limit}")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The value oracle could not evaluate a schema.
    #[error("value oracle failure: {reason}")]
    Oracle {
        /// Reason reported by the oracle backend.
        reason: String,
    },
}

/// A single compatibility failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatError {
    /// Where in each operand the failure was observed.
    pub paths: PathPair,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for CompatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.paths, self.message)
    }
}

/// Non-empty, ordered compatibility trace.
///
/// The inner `Vec` is private and every constructor inserts at least one
/// record, so an empty list cannot be observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompatErrorList(Vec<CompatError>);

impl CompatErrorList {
    /// A trace holding one record.
    pub fn single(paths: &PathPair, message: impl Into<String>) -> Self {
        Self(vec![CompatError {
            paths: paths.clone(),
            message: message.into(),
        }])
    }

    /// Append the summary of an enclosing frame.
    pub fn push_context(mut self, paths: &PathPair, message: impl Into<String>) -> Self {
        self.0.push(CompatError {
            paths: paths.clone(),
            message: message.into(),
        });
        self
    }

    /// Concatenate another trace after this one.
    pub fn extend(&mut self, other: CompatErrorList) {
        self.0.extend(other.0);
    }

    /// Number of records (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The deepest cause.
    pub fn first(&self) -> &CompatError {
        &self.0[0]
    }

    /// The outermost summary.
    pub fn last(&self) -> &CompatError {
        &self.0[self.0.len() - 1]
    }

    /// Iterate records, deepest cause first.
    pub fn iter(&self) -> std::slice::Iter<'_, CompatError> {
        self.0.iter()
    }

    /// Returns a slice of all records.
    pub fn errors(&self) -> &[CompatError] {
        &self.0
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_vec(self) -> Vec<CompatError> {
        self.0
    }

    /// True when any record's message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.0.iter().any(|e| e.message.contains(needle))
    }
}

impl<'a> IntoIterator for &'a CompatErrorList {
    type Item = &'a CompatError;
    type IntoIter = std::slice::Iter<'a, CompatError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CompatErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Result of one validator or recursive comparison; `None` is success.
pub type Outcome = Option<CompatErrorList>;
