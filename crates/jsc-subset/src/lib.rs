//! # jsc-subset — Structural Subset Checking for JSON Schema
//!
//! Decides whether every JSON value accepted by an *input* schema is also
//! accepted by a *target* schema. This is the question behind schema
//! evolution ("can a producer upgrade without breaking consumers?") and
//! behind wiring one component's output into another's input.
//!
//! ## Entry Points
//!
//! - [`check`] returns a [`Verdict`], carrying a [`CompatErrorList`] trace
//!   when the input is not a subset.
//! - [`is_subset`] is the boolean form.
//! - [`is_subset_with_trace`] is the boolean form with an out-parameter
//!   for the trace.
//!
//! All three return `Err(UsageError)` only for caller mistakes: a
//! pre-draft-5 dialect, a malformed top level, a dangling or cyclic
//! `$ref`, nesting past [`CompatOptions::max_depth`].
//!
//! ## Soundness
//!
//! A `false` verdict may be a false negative: when a construct cannot be
//! compared structurally (differing `pattern`s, keywords outside the
//! model such as `minProperties` or `contains`), the checker answers
//! `false` unless the input declares the same restriction.
//!
//! A `true` verdict rests on two approximations of object schemas:
//!
//! - a property the target declares and the input does not is not
//!   compared, so an input leaving it open still passes;
//! - a closed target (`additionalProperties: false`) only rejects extra
//!   properties the input declares, not an input that is itself open.
//!
//! ## Crate Policy
//!
//! - The caller's schema values are never modified.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod combinators;
pub mod compare;
pub mod options;
pub mod oracle;
pub mod preprocess;
pub mod rules;

use jsc_core::{Operand, PathPair};
use serde_json::Value;
use tracing::debug;

// Re-export primary types for ergonomic imports.
pub use compare::Comparator;
pub use jsc_core::{CompatError, CompatErrorList, UsageError};
pub use options::{CompatOptions, Draft};
pub use oracle::{JsonSchemaOracle, ValueOracle};
pub use preprocess::{Dereference, LocalDereferencer, SchemaRegistry};

/// Outcome of a completed subset check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every value accepted by the input is accepted by the target.
    Compatible,
    /// Not provably a subset; the trace explains why, deepest cause first.
    Incompatible(CompatErrorList),
}

impl Verdict {
    /// True for [`Verdict::Compatible`].
    pub fn is_compatible(&self) -> bool {
        matches!(self, Self::Compatible)
    }

    /// The trace, if incompatible.
    pub fn errors(&self) -> Option<&CompatErrorList> {
        match self {
            Self::Compatible => None,
            Self::Incompatible(errors) => Some(errors),
        }
    }

    /// Consume into the trace, if incompatible.
    pub fn into_errors(self) -> Option<CompatErrorList> {
        match self {
            Self::Compatible => None,
            Self::Incompatible(errors) => Some(errors),
        }
    }
}

/// Is `input` a subset of `target`?
///
/// # Errors
///
/// Returns [`UsageError`] when either operand is refused by the
/// preprocessing gates or cannot be dereferenced or parsed.
pub fn check(input: &Value, target: &Value, options: &CompatOptions) -> Result<Verdict, UsageError> {
    let dialects = preprocess::gate(input, target)?;
    let input = preprocess::normalize(Operand::Input, input, options)?;
    let target = preprocess::normalize(Operand::Target, target, options)?;
    let draft = dialects.target_draft(options.draft);
    debug!(%draft, "evaluating target literals");

    match Comparator::with_draft(options, draft).compare(&input, &target, &PathPair::root()) {
        None => {
            debug!("input schema is a subset of target");
            Ok(Verdict::Compatible)
        }
        Some(errors) => {
            for e in &errors {
                debug!(input = %e.paths.input_pointer(), target = %e.paths.target_pointer(), "{}", e.message);
            }
            Ok(Verdict::Incompatible(errors))
        }
    }
}

/// Boolean form of [`check`].
///
/// # Errors
///
/// As for [`check`].
pub fn is_subset(input: &Value, target: &Value, options: &CompatOptions) -> Result<bool, UsageError> {
    check(input, target, options).map(|v| v.is_compatible())
}

/// Boolean form of [`check`] that stores the trace of a negative verdict
/// in `trace` (and clears it on a positive one).
///
/// # Errors
///
/// As for [`check`]; `trace` is left untouched.
pub fn is_subset_with_trace(
    input: &Value,
    target: &Value,
    options: &CompatOptions,
    trace: &mut Option<CompatErrorList>,
) -> Result<bool, UsageError> {
    let verdict = check(input, target, options)?;
    let compatible = verdict.is_compatible();
    *trace = verdict.into_errors();
    Ok(compatible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_verdicts() {
        let opts = CompatOptions::default();
        assert_eq!(
            check(&json!({ "type": "integer" }), &json!({ "type": "number" }), &opts).unwrap(),
            Verdict::Compatible
        );
        let verdict = check(&json!({ "type": "number" }), &json!({ "type": "integer" }), &opts).unwrap();
        assert!(!verdict.is_compatible());
        assert!(verdict.errors().unwrap().mentions("Type mismatch"));
    }

    #[test]
    fn test_trace_out_parameter() {
        let opts = CompatOptions::default();
        let mut trace = None;
        assert!(!is_subset_with_trace(&json!({ "type": "string" }), &json!({ "type": "null" }), &opts, &mut trace).unwrap());
        assert!(trace.is_some());
        assert!(is_subset_with_trace(&json!({ "type": "null" }), &json!({ "type": "null" }), &opts, &mut trace).unwrap());
        assert!(trace.is_none());
    }

    #[test]
    fn test_usage_errors_are_err() {
        let opts = CompatOptions::default();
        let legacy = json!({ "$schema": "http://json-schema.org/draft-04/schema#", "type": "string" });
        assert!(matches!(
            is_subset(&legacy, &json!({ "type": "string" }), &opts),
            Err(UsageError::UnsupportedDialect { operand: Operand::Input, .. })
        ));
        assert!(matches!(
            is_subset(&json!({ "type": "string" }), &json!({ "minLength": 1 }), &opts),
            Err(UsageError::MalformedSchema { operand: Operand::Target, .. })
        ));
    }

    #[test]
    fn test_dialect_checked_for_both_operands_first() {
        let opts = CompatOptions::default();
        let legacy = json!({ "$schema": "http://json-schema.org/draft-04/schema#", "type": "string" });
        assert!(matches!(
            check(&json!({ "minLength": 1 }), &legacy, &opts),
            Err(UsageError::UnsupportedDialect { operand: Operand::Target, .. })
        ));
    }

    #[test]
    fn test_target_dialect_drives_literal_checks() {
        let opts = CompatOptions::default();
        let tuple = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "array",
            "prefixItems": [{ "type": "string" }]
        });
        assert!(!is_subset(&json!({ "const": [1] }), &tuple, &opts).unwrap());
        assert!(is_subset(&json!({ "const": ["a"] }), &tuple, &opts).unwrap());
    }

    #[test]
    fn test_operands_not_modified() {
        let input = json!({ "$schema": "http://json-schema.org/draft-07/schema#", "allOf": [{ "type": "string" }] });
        let before = input.clone();
        is_subset(&input, &json!({ "type": "string" }), &CompatOptions::default()).unwrap();
        assert_eq!(input, before);
    }
}
