//! Type-set containment.

use jsc_core::{CompatErrorList, Outcome, PathPair, SchemaNode};

use crate::compare::Comparator;

/// The input's types, declared or inferred from its literals, must all be
/// admitted by the target's `type`. An untyped input against a typed
/// target is a mismatch: it admits values of every type.
pub fn type_matches(_: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    let allowed = target.types.as_ref()?;
    match input.effective_types() {
        Some(actual) if actual.is_within(allowed) => None,
        Some(actual) => Some(CompatErrorList::single(
            paths,
            format!("Type mismatch: {actual} does not satisfy {allowed}"),
        )),
        None => Some(CompatErrorList::single(
            paths,
            format!("Type mismatch: any does not satisfy {allowed}"),
        )),
    }
}
