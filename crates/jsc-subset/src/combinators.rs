//! # Combinator Rules
//!
//! `anyOf`, `allOf`, `oneOf` and `not`, each judged from both sides.
//!
//! ## Dispatch
//!
//! When either operand declares `anyOf`, `allOf` or `oneOf`, the
//! comparator hands the pair to [`dispatch`] instead of the leaf rules,
//! checking `anyOf` first, then `allOf`, then `oneOf`.
//!
//! ## Input Side, Then Target Side
//!
//! An input combinator is tried first, and success there is final. If it
//! fails and the target declares the same combinator, the target-side rule
//! is tried too; the verdict fails only if both do, with both traces.
//!
//! ## Sibling Keywords
//!
//! A combinator constrains alongside its siblings:
//! `{"type": "object", "anyOf": [...]}` is the intersection of both. After
//! a target branch rule passes, the input is compared again against the
//! target with that combinator removed. Each input `anyOf`/`oneOf` branch
//! is compared together with the input's siblings, folded in by
//! [`conjoin`](crate::preprocess::conjoin).

use std::borrow::Cow;

use jsc_core::{CompatErrorList, Outcome, PathKey, PathPair, SchemaNode};
use tracing::debug;

use crate::compare::Comparator;
use crate::preprocess::conjoin;
use crate::rules::gather_literals;

/// The outcome of the first combinator either side declares, or `None`
/// when neither declares `anyOf`/`allOf`/`oneOf`.
pub fn dispatch(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Option<Outcome> {
    if input.any_of.is_some() || target.any_of.is_some() {
        return Some(any_of_matches(cmp, input, target, paths));
    }
    if input.all_of.is_some() || target.all_of.is_some() {
        return Some(all_of_matches(cmp, input, target, paths));
    }
    if input.one_of.is_some() || target.one_of.is_some() {
        return Some(one_of_matches(cmp, input, target, paths));
    }
    None
}

/// Leaf-chain safety net: re-runs [`dispatch`] for pairs that reach the
/// leaf rules.
pub fn combinators_match(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    dispatch(cmp, input, target, paths).flatten()
}

/// Combine an input-side and a target-side rule. Each closure yields
/// `None` when its side does not declare the combinator.
fn either_side(
    input_side: impl FnOnce() -> Option<Outcome>,
    target_side: impl FnOnce() -> Option<Outcome>,
) -> Outcome {
    let input_errors = match input_side() {
        Some(None) => return None,
        Some(Some(errors)) => Some(errors),
        None => None,
    };
    match (input_errors, target_side()) {
        (_, Some(None)) => None,
        (Some(mut a), Some(Some(b))) => {
            a.extend(b);
            Some(a)
        }
        (None, Some(Some(b))) => Some(b),
        (a, None) => a,
    }
}

/// `branch` with the input's remaining keywords folded in.
fn with_siblings<'b>(cmp: &Comparator<'_>, siblings: &SchemaNode, branch: &'b SchemaNode) -> Cow<'b, SchemaNode> {
    if siblings.is_unconstrained() {
        return Cow::Borrowed(branch);
    }
    match SchemaNode::parse(&conjoin(&siblings.raw, &branch.raw), cmp.options().max_depth) {
        Ok(node) => Cow::Owned(node),
        Err(e) => {
            // The bare branch admits more, so comparing it stays sound.
            debug!(error = %e, "could not fold siblings into branch");
            Cow::Borrowed(branch)
        }
    }
}

/// Every input branch, together with `siblings`, must satisfy `target`.
fn every_input_branch(
    cmp: &Comparator<'_>,
    keyword: &str,
    siblings: &SchemaNode,
    branches: &[SchemaNode],
    target: &SchemaNode,
    paths: &PathPair,
) -> Outcome {
    branches.iter().enumerate().find_map(|(i, branch)| {
        let branch = with_siblings(cmp, siblings, branch);
        cmp.compare(&branch, target, &paths.descend_input([PathKey::from(keyword), PathKey::Index(i)]))
    })
}

/// Index of every target branch `input` satisfies, or the failures of all
/// of them.
fn satisfied_branches(
    cmp: &Comparator<'_>,
    keyword: &str,
    input: &SchemaNode,
    branches: &[SchemaNode],
    paths: &PathPair,
    stop_at_first: bool,
) -> (Vec<usize>, Option<CompatErrorList>) {
    let mut matched = Vec::new();
    let mut failures: Option<CompatErrorList> = None;
    for (i, branch) in branches.iter().enumerate() {
        let at = paths.descend_target([PathKey::from(keyword), PathKey::Index(i)]);
        match cmp.compare(input, branch, &at) {
            None => {
                matched.push(i);
                if stop_at_first {
                    break;
                }
            }
            Some(errors) => match &mut failures {
                Some(f) => f.extend(errors),
                None => failures = Some(errors),
            },
        }
    }
    (matched, failures)
}

fn any_of_matches(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    either_side(
        || {
            input.any_of.as_ref().map(|branches| {
                every_input_branch(cmp, "anyOf", &input.without_any_of(), branches, target, paths)
                    .map(|e| e.push_context(paths, "Some input.anyOf elements do not satisfy target"))
            })
        },
        || {
            target.any_of.as_ref().map(|branches| {
                let (matched, failures) = satisfied_branches(cmp, "anyOf", input, branches, paths, true);
                if matched.is_empty() {
                    return Some(
                        failures
                            .unwrap_or_else(|| CompatErrorList::single(paths, "No elements found"))
                            .push_context(paths, "input does not satisfy any of target.anyOf"),
                    );
                }
                cmp.compare(input, &target.without_any_of(), paths)
            })
        },
    )
}

fn all_of_matches(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    either_side(
        || {
            input.all_of.as_ref().map(|branches| {
                // Residual branches already failed to fold into the siblings.
                let errors = every_input_branch(cmp, "allOf", &SchemaNode::empty(), branches, target, paths)?;
                // The input is also no wider than its siblings alone.
                let rest = input.without_all_of();
                if !rest.is_unconstrained() && cmp.compare(&rest, target, paths).is_none() {
                    return None;
                }
                Some(errors.push_context(paths, "failed allOf check"))
            })
        },
        || {
            target.all_of.as_ref().map(|branches| {
                for (i, branch) in branches.iter().enumerate() {
                    let at = paths.descend_target([PathKey::from("allOf"), PathKey::Index(i)]);
                    if let Some(errors) = cmp.compare(input, branch, &at) {
                        return Some(errors.push_context(paths, "failed allOf check"));
                    }
                }
                cmp.compare(input, &target.without_all_of(), paths)
            })
        },
    )
}

fn one_of_matches(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    const SUMMARY: &str = "input does not satisfy exactly one of target.oneOf";
    either_side(
        || {
            input.one_of.as_ref().map(|branches| {
                every_input_branch(cmp, "oneOf", &input.without_one_of(), branches, target, paths)
                    .map(|e| e.push_context(paths, "Some input.oneOf elements do not satisfy target"))
            })
        },
        || {
            target.one_of.as_ref().map(|branches| {
                let (matched, failures) = satisfied_branches(cmp, "oneOf", input, branches, paths, false);
                match matched.len() {
                    1 => cmp.compare(input, &target.without_one_of(), paths),
                    0 => Some(
                        failures
                            .unwrap_or_else(|| CompatErrorList::single(paths, "No elements found"))
                            .push_context(paths, "oneOf does not match any branches")
                            .push_context(paths, SUMMARY),
                    ),
                    _ => Some(
                        CompatErrorList::single(paths, "oneOf matches more than one branch")
                            .push_context(paths, SUMMARY),
                    ),
                }
            })
        },
    )
}

/// Negation, run last in the leaf chain.
///
/// An input `not` must itself fail against the target. A target `not`
/// must not be satisfied by the input; when the input is restricted to
/// literals, each literal is checked against the negated schema exactly.
pub fn not_matches(cmp: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if let Some(negated) = &input.not {
        if cmp.compare(negated, target, &paths.descend_input(["not"])).is_none() {
            return Some(CompatErrorList::single(paths, "input.not should not satisfy target"));
        }
    }
    let Some(negated) = &target.not else {
        return None;
    };
    if let Some(literals) = gather_literals(input) {
        // Every literal must be rejected by the negated schema.
        let excluded = literals
            .iter()
            .all(|v| matches!(cmp.oracle().accepts(&negated.raw, v), Ok(false)));
        if excluded {
            return None;
        }
        return Some(CompatErrorList::single(paths, "input should not satisfy target.not"));
    }
    if cmp.compare(input, negated, &paths.descend_target(["not"])).is_none() {
        return Some(CompatErrorList::single(paths, "input should not satisfy target.not"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompatOptions;
    use serde_json::{json, Value};

    fn run(input: Value, target: Value) -> Outcome {
        let opts = CompatOptions::default();
        let input = SchemaNode::from_value(&input).unwrap();
        let target = SchemaNode::from_value(&target).unwrap();
        Comparator::new(&opts).compare(&input, &target, &PathPair::root())
    }

    #[test]
    fn test_input_any_of_needs_every_branch() {
        let target = json!({ "type": "string" });
        assert!(run(json!({ "anyOf": [{ "type": "string" }, { "type": "string", "minLength": 2 }] }), target.clone()).is_none());
        let err = run(json!({ "anyOf": [{ "type": "string" }, { "type": "number" }] }), target).unwrap();
        assert_eq!(err.last().message, "Some input.anyOf elements do not satisfy target");
        assert_eq!(err.first().paths.input_pointer(), "/anyOf/1");
    }

    #[test]
    fn test_target_any_of_needs_one_branch_and_siblings() {
        let target = json!({ "type": "object", "anyOf": [{ "required": ["a"] }, { "required": ["b"] }] });
        assert!(run(json!({ "type": "object", "required": ["b"] }), target.clone()).is_none());
        let err = run(json!({ "type": "object", "required": ["c"] }), target).unwrap();
        assert_eq!(err.last().message, "input does not satisfy any of target.anyOf");

        // Sibling keywords still apply once a branch matches.
        let target = json!({ "type": "object", "anyOf": [{ "required": ["a"] }] });
        assert!(run(json!({ "type": "array", "required": ["a"] }), target).is_some());
    }

    #[test]
    fn test_input_branches_keep_siblings() {
        assert!(run(json!({ "type": "string", "anyOf": [{ "minLength": 1 }] }), json!({ "type": "string" })).is_none());
        assert!(run(
            json!({ "type": "string", "oneOf": [{ "minLength": 2 }, { "maxLength": 0 }] }),
            json!({ "type": "string", "maxLength": 10 })
        )
        .unwrap()
        .mentions("Some input.oneOf elements do not satisfy target"));
        let err = run(json!({ "type": "integer", "anyOf": [{ "minimum": 0 }] }), json!({ "type": "string" })).unwrap();
        assert!(err.mentions("Type mismatch: integer does not satisfy string"));
    }

    #[test]
    fn test_both_sides_any_of() {
        let target = json!({ "anyOf": [{ "type": "string" }, { "type": "number" }] });
        assert!(run(json!({ "anyOf": [{ "type": "integer" }, { "type": "string" }] }), target).is_none());
    }

    #[test]
    fn test_target_all_of() {
        let target = json!({ "allOf": [{ "type": "integer" }, { "minimum": 0 }] });
        assert!(run(json!({ "type": "integer", "minimum": 5 }), target.clone()).is_none());
        let err = run(json!({ "type": "integer" }), target).unwrap();
        assert_eq!(err.last().message, "failed allOf check");
        assert_eq!(err.first().paths.target_pointer(), "/allOf/1");
    }

    #[test]
    fn test_input_all_of() {
        let target = json!({ "type": "number" });
        assert!(run(json!({ "allOf": [{ "type": "integer" }, { "type": "number" }] }), target.clone()).is_none());
        // Siblings alone can carry the proof.
        assert!(run(json!({ "type": "integer", "allOf": [{ "pattern": "x" }] }), target.clone()).is_none());
        assert!(run(json!({ "allOf": [{ "type": "string" }, { "type": "number" }] }), target)
            .unwrap()
            .mentions("failed allOf check"));
    }

    #[test]
    fn test_one_of_exactly_one() {
        let target = json!({
            "type": "object",
            "oneOf": [
                { "type": "object", "properties": { "foo": { "type": "boolean" } }, "required": ["foo"] },
                { "type": "object", "properties": { "foo": { "type": "string" } }, "required": ["foo"] }
            ]
        });
        assert!(run(
            json!({ "type": "object", "required": ["foo"], "properties": { "foo": { "type": "boolean" } } }),
            target.clone()
        )
        .is_none());
        let err = run(json!({ "type": "object", "required": ["foo"], "properties": { "foo": { "type": "number" } } }), target).unwrap();
        assert!(err.mentions("oneOf does not match any branches"));
        assert_eq!(err.last().message, "input does not satisfy exactly one of target.oneOf");
    }

    #[test]
    fn test_one_of_ambiguous() {
        let target = json!({ "oneOf": [{ "type": "object" }, { "type": "object", "properties": { "a": { "type": "string" } } }] });
        let err = run(json!({ "type": "object" }), target).unwrap();
        assert_eq!(err.first().message, "oneOf matches more than one branch");
    }

    #[test]
    fn test_input_one_of() {
        let target = json!({ "type": ["string", "null"] });
        assert!(run(json!({ "oneOf": [{ "type": "string" }, { "type": "null" }] }), target).is_none());
    }

    #[test]
    fn test_target_not() {
        let target = json!({ "not": { "type": "string" } });
        assert!(run(json!({ "type": "number" }), target.clone()).is_none());
        let err = run(json!({ "type": "string" }), target).unwrap();
        assert!(err.mentions("input should not satisfy target.not"));
    }

    #[test]
    fn test_target_not_with_literals_is_exact() {
        let target = json!({ "type": "string", "not": { "const": "b" } });
        assert!(run(json!({ "type": "string", "enum": ["a", "c"] }), target.clone()).is_none());
        assert!(run(json!({ "type": "string", "enum": ["a", "b"] }), target).is_some());
    }

    #[test]
    fn test_input_not() {
        let err = run(json!({ "type": "string", "not": { "type": "string" } }), json!({ "type": "string", "minLength": 0 }));
        assert!(err.unwrap().mentions("input.not should not satisfy target"));
    }

    #[test]
    fn test_never_input_is_subset_of_anything() {
        assert!(run(json!(false), json!({ "type": "string" })).is_none());
    }
}
