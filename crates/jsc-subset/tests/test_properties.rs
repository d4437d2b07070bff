//! # Property Tests
//!
//! Structural laws every verdict must respect, checked over generated
//! numeric, string, literal and array schemas:
//!
//! - every schema is a subset of itself, of `{}` and of `true`;
//! - `false` is a subset of everything;
//! - removing a constraint from a schema yields a superset;
//! - a positive verdict is never contradicted by a concrete value that
//!   the input accepts and the target rejects.

use jsc_subset::{is_subset, CompatOptions, JsonSchemaOracle, ValueOracle};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const STEPS: &[f64] = &[1.0, 2.0, 3.0, 0.5, 0.25];
const WORDS: &[&str] = &["a", "bb", "ccc", "dddd"];

fn object(type_name: &str, members: Vec<(&str, Option<Value>)>) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(type_name));
    for (key, value) in members {
        if let Some(v) = value {
            map.insert(key.to_string(), v);
        }
    }
    Value::Object(map)
}

fn numeric_schema() -> impl Strategy<Value = Value> {
    (
        prop::sample::select(vec!["integer", "number"]),
        prop::option::of(-5i64..5),
        prop::option::of(-5i64..5),
        prop::option::of(-5i64..5),
        prop::option::of(-5i64..5),
        prop::option::of(prop::sample::select(STEPS.to_vec())),
    )
        .prop_map(|(t, min, max, xmin, xmax, step)| {
            object(
                t,
                vec![
                    ("minimum", min.map(|v| json!(v))),
                    ("maximum", max.map(|v| json!(v))),
                    ("exclusiveMinimum", xmin.map(|v| json!(v))),
                    ("exclusiveMaximum", xmax.map(|v| json!(v))),
                    ("multipleOf", step.map(|v| json!(v))),
                ],
            )
        })
}

fn string_schema() -> impl Strategy<Value = Value> {
    (
        prop::option::of(0u64..4),
        prop::option::of(0u64..5),
        prop::option::of(prop::sample::subsequence(WORDS.to_vec(), 1..=WORDS.len())),
    )
        .prop_map(|(min, max, words)| {
            object(
                "string",
                vec![
                    ("minLength", min.map(|v| json!(v))),
                    ("maxLength", max.map(|v| json!(v))),
                    ("enum", words.map(|w| json!(w))),
                ],
            )
        })
}

fn const_schema() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-5i64..5).prop_map(|v| json!({ "const": v })),
        prop::sample::select(WORDS.to_vec()).prop_map(|w| json!({ "const": w })),
    ]
}

fn array_schema() -> impl Strategy<Value = Value> {
    (
        prop::option::of(0u64..3),
        prop::option::of(0u64..4),
        prop::option::of(numeric_schema()),
    )
        .prop_map(|(min, max, items)| {
            object(
                "array",
                vec![
                    ("minItems", min.map(|v| json!(v))),
                    ("maxItems", max.map(|v| json!(v))),
                    ("items", items),
                ],
            )
        })
}

fn schema() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => numeric_schema(),
        3 => string_schema(),
        1 => const_schema(),
        2 => array_schema(),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-6i64..6).prop_map(|v| json!(v)),
        (-6i64..6).prop_map(|v| json!(v as f64 + 0.5)),
        prop::sample::select(vec!["", "a", "bb", "zz", "ccc", "dddd", "eeeee"]).prop_map(|s| json!(s)),
        prop::collection::vec((-4i64..4).prop_map(|v| json!(v)), 0..5).prop_map(Value::Array),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Every member except `type`, so the loosened schema stays well formed.
fn removable_keys(schema: &Value) -> Vec<String> {
    schema
        .as_object()
        .map(|m| m.keys().filter(|k| *k != "type").cloned().collect())
        .unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn reflexive(s in schema()) {
        prop_assert!(is_subset(&s, &s, &CompatOptions::default()).unwrap());
    }

    #[test]
    fn open_schemas_accept_everything(s in schema()) {
        let opts = CompatOptions::default();
        let empty = json!({});
        prop_assert!(is_subset(&s, &empty, &opts).unwrap());
        prop_assert!(is_subset(&s, &json!(true), &opts).unwrap());
        prop_assert!(is_subset(&json!(false), &s, &opts).unwrap());
    }

    #[test]
    fn loosening_yields_a_superset(s in schema(), pick in any::<prop::sample::Index>()) {
        let keys = removable_keys(&s);
        prop_assume!(!keys.is_empty() && s.get("type").is_some());
        let key = pick.get(&keys);
        let mut loosened = s.clone();
        if let Some(map) = loosened.as_object_mut() {
            map.remove(key);
        }
        prop_assert!(
            is_subset(&s, &loosened, &CompatOptions::default()).unwrap(),
            "{} should fit inside {}", s, loosened
        );
    }

    #[test]
    fn positive_verdicts_are_sound(
        input in schema(),
        target in schema(),
        values in prop::collection::vec(value(), 1..24),
    ) {
        let opts = CompatOptions::default();
        if is_subset(&input, &target, &opts).unwrap() {
            let oracle = JsonSchemaOracle::default();
            for v in &values {
                if oracle.accepts(&input, v).unwrap() {
                    prop_assert!(
                        oracle.accepts(&target, v).unwrap(),
                        "{} accepts {} but {} does not", input, v, target
                    );
                }
            }
        }
    }
}
