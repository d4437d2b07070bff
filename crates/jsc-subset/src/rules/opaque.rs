//! Keywords the model keeps verbatim (see `SchemaNode::opaque`).
//!
//! Property and item counts compare as bounds. Any other such keyword in
//! the target is only satisfied by an input that declares the identical
//! value.

use jsc_core::{CompatErrorList, Outcome, PathPair, SchemaNode, TypeName};
use serde_json::Value;

use super::{family_applies, ARRAY_FAMILY, OBJECT_FAMILY};
use crate::compare::Comparator;

const OBJECT_KEYWORDS: &[&str] = &[
    "minProperties",
    "maxProperties",
    "patternProperties",
    "propertyNames",
    "dependencies",
    "dependentRequired",
    "dependentSchemas",
    "unevaluatedProperties",
];

const ARRAY_KEYWORDS: &[&str] = &[
    "contains",
    "minContains",
    "maxContains",
    "additionalItems",
    "prefixItems",
    "unevaluatedItems",
];

fn family(keyword: &str) -> Option<&'static [TypeName]> {
    if OBJECT_KEYWORDS.contains(&keyword) {
        Some(OBJECT_FAMILY)
    } else if ARRAY_KEYWORDS.contains(&keyword) {
        Some(ARRAY_FAMILY)
    } else {
        None
    }
}

/// Every opaque keyword of the target must be matched by the input.
pub fn opaque_keywords_match(_: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    for (keyword, expected) in &target.opaque {
        if family(keyword).is_some_and(|f| !family_applies(input, target, f)) {
            continue;
        }
        let declared = input.opaque.get(keyword);
        let satisfied = match keyword.as_str() {
            "minProperties" => bound_holds(declared, expected, |i, t| i >= t),
            "maxProperties" => bound_holds(declared, expected, |i, t| i <= t),
            _ => declared == Some(expected),
        };
        if !satisfied {
            let message = match declared {
                Some(actual) => format!("input {keyword} {actual} does not satisfy target {keyword} {expected}"),
                None => format!("input does not declare target {keyword} {expected}"),
            };
            return Some(CompatErrorList::single(paths, message));
        }
    }
    None
}

fn bound_holds(declared: Option<&Value>, expected: &Value, holds: impl Fn(f64, f64) -> bool) -> bool {
    match (declared.and_then(Value::as_f64), expected.as_f64()) {
        (Some(i), Some(t)) => holds(i, t),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompatOptions;
    use serde_json::json;

    fn run(input: Value, target: Value) -> Outcome {
        let opts = CompatOptions::default();
        let input = SchemaNode::from_value(&input).unwrap();
        let target = SchemaNode::from_value(&target).unwrap();
        opaque_keywords_match(&Comparator::new(&opts), &input, &target, &PathPair::root())
    }

    #[test]
    fn test_property_counts_are_bounds() {
        let target = json!({ "type": "object", "minProperties": 3, "maxProperties": 5 });
        assert!(run(json!({ "type": "object", "minProperties": 4, "maxProperties": 5 }), target.clone()).is_none());
        let err = run(json!({ "type": "object" }), target.clone()).unwrap();
        assert_eq!(err.first().message, "input does not declare target maxProperties 5");
        let err = run(json!({ "type": "object", "minProperties": 1, "maxProperties": 5 }), target).unwrap();
        assert_eq!(err.first().message, "input minProperties 1 does not satisfy target minProperties 3");
    }

    #[test]
    fn test_other_keywords_need_identical_value() {
        let target = json!({ "type": "array", "contains": { "type": "integer" } });
        assert!(run(json!({ "type": "array", "contains": { "type": "integer" } }), target.clone()).is_none());
        assert!(run(json!({ "type": "array", "contains": { "type": "number" } }), target.clone()).is_some());
        assert!(run(json!({ "type": "array" }), target).is_some());
        assert!(run(json!({ "type": "string" }), json!({ "if": { "minLength": 1 }, "then": { "maxLength": 2 } })).is_some());
    }

    #[test]
    fn test_skipped_for_other_families() {
        assert!(run(json!({ "type": "string" }), json!({ "minProperties": 2 })).is_none());
        assert!(run(json!({ "type": "object" }), json!({ "contains": { "type": "integer" } })).is_none());
    }
}
