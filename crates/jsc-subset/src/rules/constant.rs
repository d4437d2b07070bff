//! `const`, and `enum` for pairs the string rules do not cover.

use jsc_core::{CompatErrorList, Outcome, PathPair, SchemaNode};

use super::{enum_contained, family_applies, gather_literals, literal_eq, STRING_FAMILY};
use crate::compare::Comparator;

/// A target `const` requires the input to be restricted to that single
/// value. A target `enum` requires every input literal to be listed; for
/// string-typed pairs that check belongs to the string rules. Pairs whose
/// declared types disagree are left to the type rule.
pub fn const_match(_: &Comparator<'_>, input: &SchemaNode, target: &SchemaNode, paths: &PathPair) -> Outcome {
    if let (Some(i), Some(t)) = (&input.types, &target.types) {
        if !i.is_within(t) {
            return None;
        }
    }
    if let Some(expected) = &target.const_value {
        let literals = gather_literals(input);
        let matches = literals
            .as_ref()
            .is_some_and(|l| !l.is_empty() && l.iter().all(|v| literal_eq(v, expected)));
        if !matches {
            let actual = match &literals {
                Some(l) if l.len() == 1 => l[0].to_string(),
                Some(l) => serde_json::Value::Array(l.clone()).to_string(),
                None => "undefined".to_string(),
            };
            return Some(CompatErrorList::single(
                paths,
                format!("input const mismatch ({expected} !== {actual})"),
            ));
        }
    }
    if family_applies(input, target, STRING_FAMILY) {
        return None;
    }
    enum_contained(input, target, paths)
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
        const_match(&Comparator::new(&opts), &input, &target, &PathPair::root())
    }

    #[test]
    fn test_target_const() {
        assert!(run(json!({ "enum": [3] }), json!({ "const": 3 })).is_none());
        assert!(run(json!({ "enum": [3.0] }), json!({ "const": 3 })).is_none());
        let err = run(json!({ "enum": [3, 4] }), json!({ "const": 3 })).unwrap();
        assert_eq!(err.first().message, "input const mismatch (3 !== [3,4])");
        let err = run(json!({ "type": "integer" }), json!({ "const": 3 })).unwrap();
        assert_eq!(err.first().message, "input const mismatch (3 !== undefined)");
    }

    #[test]
    fn test_numeric_enum_containment() {
        let target = json!({ "type": "integer", "enum": [1, 2, 3] });
        assert!(run(json!({ "type": "integer", "enum": [1, 3] }), target.clone()).is_none());
        assert!(run(json!({ "type": "integer", "enum": [1, 5] }), target.clone())
            .unwrap()
            .mentions("missing possible input enum: 5"));
        assert!(run(json!({ "type": "integer" }), target)
            .unwrap()
            .mentions("missing enum restrictions"));
    }

    #[test]
    fn test_type_disagreement_left_to_type_rule() {
        assert!(run(json!({ "type": "integer", "enum": [5] }), json!({ "type": "string", "enum": ["a"] })).is_none());
        assert!(run(json!({ "type": "integer" }), json!({ "type": "string", "const": "a" })).is_none());
    }

    #[test]
    fn test_string_enum_left_to_string_rules() {
        assert!(run(json!({ "type": "string" }), json!({ "type": "string", "enum": ["a"] })).is_none());
    }
}
