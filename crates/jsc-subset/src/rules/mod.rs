//! # Leaf Rules
//!
//! One validator per keyword family. Every validator has the same shape,
//! [`Validator`]: it inspects an `(input, target)` pair at a
//! [`PathPair`] and returns `None` on success or a trace on failure. The
//! comparator runs them in a fixed order and stops at the first failure.
//!
//! ## Family Guard
//!
//! Keyword families only apply to values of their type: `minLength` says
//! nothing about integers. [`family_applies`] decides whether a family is
//! relevant to the pair; when both sides declare incompatible types, all
//! families step aside and the type rule reports the mismatch.

pub mod array;
pub mod constant;
pub mod numeric;
pub mod object;
pub mod opaque;
pub mod string;
pub mod types;

use jsc_core::{Outcome, PathPair, SchemaNode, TypeName};
use serde_json::Value;

use crate::compare::Comparator;

/// A leaf rule.
pub type Validator = fn(&Comparator<'_>, &SchemaNode, &SchemaNode, &PathPair) -> Outcome;

pub(crate) const STRING_FAMILY: &[TypeName] = &[TypeName::String];
pub(crate) const NUMERIC_FAMILY: &[TypeName] = &[TypeName::Integer, TypeName::Number];
pub(crate) const ARRAY_FAMILY: &[TypeName] = &[TypeName::Array];
pub(crate) const OBJECT_FAMILY: &[TypeName] = &[TypeName::Object];

/// Whether the rules of `family` should run for this pair.
pub fn family_applies(input: &SchemaNode, target: &SchemaNode, family: &[TypeName]) -> bool {
    let input_types = input.effective_types();
    match (&target.types, input_types) {
        (Some(t), Some(i)) => i.is_within(t) && i.iter().any(|name| family.contains(&name)),
        (Some(t), None) => family.iter().any(|name| t.contains(*name)),
        (None, Some(i)) => i.iter().any(|name| family.contains(&name)),
        (None, None) => true,
    }
}

/// Every literal the input can take, gathered through `const`, `enum`
/// and the branches of its combinators. `None` when any reachable branch
/// is unrestricted.
pub fn gather_literals(node: &SchemaNode) -> Option<Vec<Value>> {
    if let Some(values) = node.literal_values() {
        return Some(values.into_iter().cloned().collect());
    }
    let branches = node
        .all_of
        .as_ref()
        .or(node.any_of.as_ref())
        .or(node.one_of.as_ref())?;
    let mut out: Vec<Value> = Vec::new();
    for branch in branches {
        for value in gather_literals(branch)? {
            if !out.iter().any(|v| literal_eq(v, &value)) {
                out.push(value);
            }
        }
    }
    Some(out)
}

/// JSON equality with numbers compared by value, so `1` equals `1.0`.
pub fn literal_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.as_f64().is_some() && x.as_f64() == y.as_f64()),
        _ => a == b,
    }
}

/// Literals of `input` absent from `allowed`, rendered for messages.
pub(crate) fn missing_literals<'v>(input: &'v [Value], allowed: &[Value]) -> Vec<&'v Value> {
    input
        .iter()
        .filter(|v| !allowed.iter().any(|a| literal_eq(a, v)))
        .collect()
}

/// The `enum` containment check shared by the string and constant rules.
pub(crate) fn enum_contained(input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    let allowed = target.enum_values.as_ref()?;
    let Some(literals) = gather_literals(input) else {
        return Some(jsc_core::CompatErrorList::single(paths, "input is missing enum restrictions"));
    };
    let missing = missing_literals(&literals, allowed);
    let first = missing.first()?;
    Some(jsc_core::CompatErrorList::single(
        paths,
        format!("target {} is missing possible input enum: {first}", Value::Array(allowed.clone())),
    ))
}
