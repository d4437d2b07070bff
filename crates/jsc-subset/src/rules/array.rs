//! # Array Rules
//!
//! Length bounds, item shapes and `uniqueItems`. Tuple-form `items`
//! describe fixed-length arrays, so a tuple's length doubles as its
//! `minItems` and `maxItems` when those are absent.

use jsc_core::{CompatErrorList, Items, Outcome, PathKey, PathPair, SchemaNode};

use super::{family_applies, ARRAY_FAMILY};
use crate::compare::Comparator;

fn tuple_len(node: &SchemaNode) -> Option<u64> {
    match &node.items {
        Some(Items::Tuple(t)) => Some(t.len() as u64),
        _ => None,
    }
}

/// `minItems`, or the tuple length.
pub fn effective_min_items(node: &SchemaNode) -> Option<u64> {
    node.min_items.or_else(|| tuple_len(node))
}

/// `maxItems`, or the tuple length.
pub fn effective_max_items(node: &SchemaNode) -> Option<u64> {
    node.max_items.or_else(|| tuple_len(node))
}

/// Array keyword containment.
pub fn array_rules_match(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if !family_applies(input, target, ARRAY_FAMILY) {
        return None;
    }

    if let Some(min) = target.min_items {
        if effective_min_items(input).unwrap_or(0) < min {
            return Some(CompatErrorList::single(paths, "input minItems is less than target"));
        }
    }
    let input_max = effective_max_items(input);
    if let Some(max) = target.max_items {
        if input_max.map_or(true, |m| m > max) {
            return Some(CompatErrorList::single(paths, "input maxItems is more than target"));
        }
    }

    // The empty array satisfies any item shape.
    if input_max != Some(0) {
        if let Some(errors) = items_match(cmp, input, target, paths) {
            return Some(errors);
        }
    }

    if target.unique_items && !input.unique_items {
        return Some(CompatErrorList::single(paths, "input does not require uniqueItems"));
    }
    None
}

fn items_match(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    match (&input.items, &target.items) {
        (_, None) => None,
        (None, Some(Items::Tuple(_))) => Some(CompatErrorList::single(paths, "input is missing items")),
        (Some(Items::List(_)), Some(Items::Tuple(_))) => {
            Some(CompatErrorList::single(paths, "Tuple item count mismatch"))
        }
        (Some(Items::Tuple(ins)), Some(Items::Tuple(outs))) => {
            if ins.len() != outs.len() {
                return Some(CompatErrorList::single(paths, "Tuple item count mismatch"));
            }
            for (i, (a, b)) in ins.iter().zip(outs).enumerate() {
                let at = paths.descend_both("items").descend_both(i);
                if let Some(errors) = cmp.compare(a, b, &at) {
                    return Some(errors.push_context(paths, "Tuple items mismatch (see previous error)"));
                }
            }
            None
        }
        (Some(Items::Tuple(ins)), Some(Items::List(out))) => {
            for (i, a) in ins.iter().enumerate() {
                let at = paths
                    .descend_input([PathKey::from("items"), PathKey::Index(i)])
                    .descend_target(["items"]);
                if let Some(errors) = cmp.compare(a, out, &at) {
                    return Some(errors.push_context(paths, "Tuple items mismatch (see previous error)"));
                }
            }
            None
        }
        (Some(Items::List(a)), Some(Items::List(b))) => cmp
            .compare(a, b, &paths.descend_both("items"))
            .map(|errors| errors.push_context(paths, "Array items mismatch (see previous error)")),
        (None, Some(Items::List(b))) => cmp
            .compare(&SchemaNode::empty(), b, &paths.descend_both("items"))
            .map(|errors| errors.push_context(paths, "Array items mismatch (see previous error)")),
    }
}
