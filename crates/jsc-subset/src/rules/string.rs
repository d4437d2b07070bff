//! # String Rules
//!
//! `format`, `pattern`, `minLength`, `maxLength` and `enum` for
//! string-typed pairs. Lengths count Unicode scalar values.
//!
//! An input without its own length bound may still be bounded by its
//! literals or by its combinator branches; [`effective_min_length`] and
//! [`effective_max_length`] recover those bounds.

use jsc_core::{CompatErrorList, Outcome, PathPair, SchemaNode};
use serde_json::{json, Value};

use super::{enum_contained, family_applies, gather_literals, STRING_FAMILY};
use crate::compare::Comparator;

/// Target format -> input formats it generalizes.
const FORMAT_GENERALIZATIONS: &[(&str, &[&str])] = &[
    ("uri-reference", &["uri"]),
    ("iri", &["uri", "iri"]),
    ("iri-reference", &["uri", "uri-reference", "iri"]),
    ("idn-email", &["email"]),
    ("idn-hostname", &["hostname"]),
];

/// True when every string valid for `input` format is valid for `target`.
pub fn format_generalizes(target: &str, input: Option<&str>) -> bool {
    let Some(input) = input else {
        return false;
    };
    target == input
        || FORMAT_GENERALIZATIONS
            .iter()
            .any(|(t, inputs)| *t == target && inputs.contains(&input))
}

fn string_lengths(node: &SchemaNode) -> Option<Vec<u64>> {
    let literals = node.literal_values()?;
    let lengths: Vec<u64> = literals
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.chars().count() as u64)
        .collect();
    (!lengths.is_empty()).then_some(lengths)
}

fn branches(node: &SchemaNode) -> Option<&Vec<SchemaNode>> {
    node.all_of.as_ref().or(node.any_of.as_ref()).or(node.one_of.as_ref())
}

/// Smallest length the input admits: its own `minLength`, tightened by
/// string literals, else the smallest branch minimum, else 0.
pub fn effective_min_length(node: &SchemaNode) -> u64 {
    let from_literals = string_lengths(node).and_then(|l| l.into_iter().min());
    match (node.min_length, from_literals) {
        (Some(m), Some(l)) => m.max(l),
        (Some(m), None) => m,
        (None, Some(l)) => l,
        (None, None) => branches(node)
            .and_then(|b| b.iter().map(effective_min_length).min())
            .unwrap_or(0),
    }
}

/// Largest length the input admits, `None` when unbounded: its own
/// `maxLength`, tightened by string literals, else the largest branch
/// maximum (unbounded if any branch is).
pub fn effective_max_length(node: &SchemaNode) -> Option<u64> {
    let from_literals = string_lengths(node).and_then(|l| l.into_iter().max());
    match (node.max_length, from_literals) {
        (Some(m), Some(l)) => Some(m.min(l)),
        (Some(m), None) => Some(m),
        (None, Some(l)) => Some(l),
        (None, None) => branches(node)?
            .iter()
            .map(effective_max_length)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .max(),
    }
}

/// String keyword containment.
pub fn string_rules_match(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if !family_applies(input, target, STRING_FAMILY) {
        return None;
    }

    if let Some(format) = &target.format {
        if input.format.as_deref() != Some(format.as_str()) {
            if let Some(literals) = gather_literals(input) {
                if let Some(errors) = literals_satisfy_format(cmp, &literals, format, paths) {
                    return Some(errors);
                }
            } else if !format_generalizes(format, input.format.as_deref()) {
                return Some(CompatErrorList::single(paths, "String format mismatch"));
            }
        }
    }

    if let Some(pattern) = &target.pattern {
        if input.pattern.as_ref() != Some(pattern) {
            return Some(CompatErrorList::single(paths, "String pattern mismatch"));
        }
    }

    if let Some(min) = target.min_length {
        if effective_min_length(input) < min {
            return Some(CompatErrorList::single(paths, "input minLength is less than target"));
        }
    }

    if let Some(max) = target.max_length {
        match effective_max_length(input) {
            Some(m) if m <= max => {}
            _ => return Some(CompatErrorList::single(paths, "input maxLength is more than target")),
        }
    }

    enum_contained(input, target, paths)
}

fn literals_satisfy_format(cmp: &Comparator<'_>, literals: &[Value], format: &str, paths: &PathPair) -> Outcome {
    let schema = json!({ "format": format });
    let refs: Vec<&Value> = literals.iter().collect();
    match cmp.oracle().first_rejected(&schema, &refs) {
        Ok(None) => None,
        Ok(Some(i)) => {
            let value = literals.get(i).map(Value::to_string).unwrap_or_default();
            Some(CompatErrorList::single(
                paths,
                format!("input enum value {value} does not satisfy format {format}"),
            ))
        }
        Err(e) => Some(CompatErrorList::single(
            paths,
            format!("String format mismatch: {e}"),
        )),
    }
}
