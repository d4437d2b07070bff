//! # Comparison Driver
//!
//! [`Comparator::compare`] decides whether every value accepted by an
//! input node is accepted by a target node. In order:
//!
//! 1. **Trivial acceptance**: structurally equal nodes, an unconstrained
//!    target, or an input no value satisfies.
//! 2. **Unresolved references** fail unless step 1 already matched them.
//! 3. **Literal input**: an input `const` is handed to the value oracle,
//!    which answers exactly.
//! 4. **Combinators**: see [`crate::combinators`].
//! 5. **Leaf chain**: the rules in [`LEAF_CHAIN`], first failure wins.
//!
//! A failing leaf rule's trace gains one `Validator failed: <rule>` entry.
//!
//! Every schema handed to the oracle comes from the target operand, so
//! [`Comparator::with_draft`] takes the target's dialect.

use std::sync::Arc;

use jsc_core::{CompatErrorList, Outcome, PathPair, SchemaNode};
use tracing::{debug, trace};

use crate::combinators;
use crate::options::{CompatOptions, Draft};
use crate::oracle::ValueOracle;
use crate::rules::{array, constant, numeric, object, opaque, string, types, Validator};

/// Leaf rules in evaluation order.
pub const LEAF_CHAIN: &[(&str, Validator)] = &[
    ("array_rules_match", array::array_rules_match),
    ("const_match", constant::const_match),
    ("num_rules_match", numeric::num_rules_match),
    ("string_rules_match", string::string_rules_match),
    ("no_extraneous_props", object::no_extraneous_props),
    ("has_required_props", object::has_required_props),
    ("properties_match", object::properties_match),
    ("opaque_keywords_match", opaque::opaque_keywords_match),
    ("type_matches", types::type_matches),
    ("combinators_match", combinators::combinators_match),
    ("not_matches", combinators::not_matches),
];

/// Recursive subset comparison under one set of options.
#[derive(Debug)]
pub struct Comparator<'a> {
    options: &'a CompatOptions,
    oracle: Arc<dyn ValueOracle>,
}

impl<'a> Comparator<'a> {
    /// A comparator using the options' oracle.
    pub fn new(options: &'a CompatOptions) -> Self {
        Self::with_draft(options, options.draft)
    }

    /// A comparator whose default oracle evaluates target schemas under
    /// `draft`.
    pub fn with_draft(options: &'a CompatOptions, draft: Draft) -> Self {
        Self {
            options,
            oracle: options.oracle_for(draft),
        }
    }

    /// The options in force.
    pub fn options(&self) -> &CompatOptions {
        self.options
    }

    /// The value oracle in force.
    pub fn oracle(&self) -> &dyn ValueOracle {
        self.oracle.as_ref()
    }

    /// `None` when `input` is a subset of `target`, else the trace.
    pub fn compare(&self, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
        trace!(input = %paths.input_pointer(), target = %paths.target_pointer(), "compare");

        if input.raw == target.raw || target.is_unconstrained() || input.is_never() {
            return None;
        }

        if let Some(reference) = input.reference.as_ref().or(target.reference.as_ref()) {
            return Some(CompatErrorList::single(
                paths,
                format!("cannot compare unresolved reference {reference}"),
            ));
        }

        if let Some(value) = &input.const_value {
            match self.oracle.accepts(&target.raw, value) {
                Ok(true) => return None,
                Ok(false) => {
                    return Some(CompatErrorList::single(
                        paths,
                        format!("input const value {value} is rejected by target"),
                    ))
                }
                Err(e) => debug!(error = %e, "oracle could not evaluate target; using structural rules"),
            }
        }

        if let Some(outcome) = combinators::dispatch(self, input, target, paths) {
            return outcome;
        }

        for (name, validator) in LEAF_CHAIN {
            if let Some(errors) = validator(self, input, target, paths) {
                trace!(rule = name, at = %paths, "leaf rule failed");
                return Some(errors.push_context(paths, format!("Validator failed: {name}")));
            }
        }
        None
    }
}
