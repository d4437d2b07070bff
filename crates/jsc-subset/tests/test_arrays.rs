//! # Array Keywords
//!
//! Item-count bounds, list and tuple `items`, and `uniqueItems`.

mod common;

use common::{assert_satisfies, assert_violates};
use serde_json::json;

#[test]
fn compatible_list_array() {
    assert_satisfies(
        &json!({ "type": "array", "minItems": 1, "maxItems": 10, "items": { "type": "string" } }),
        &json!({ "type": "array", "minItems": 0, "maxItems": 11, "items": { "type": "string" } }),
    );
}

#[test]
fn incompatible_items() {
    let errors = assert_violates(
        &json!({ "type": "array", "minItems": 1, "maxItems": 10, "items": { "type": "string" } }),
        &json!({ "type": "array", "minItems": 0, "maxItems": 11, "items": { "type": "number" } }),
    );
    assert!(errors.mentions("Array items mismatch"));
    assert_eq!(errors.first().paths.input_pointer(), "/items");
}

#[test]
fn item_count_conflicts() {
    let target = json!({ "type": "array", "minItems": 2, "maxItems": 11 });
    assert_violates(&json!({ "type": "array", "minItems": 1, "maxItems": 10 }), &target);
    assert_violates(&json!({ "type": "array", "maxItems": 1 }), &target);

    let target = json!({ "type": "array", "minItems": 0, "maxItems": 11 });
    assert_violates(&json!({ "type": "array", "minItems": 1, "maxItems": 12 }), &target);
    assert_violates(&json!({ "type": "array", "minItems": 12 }), &target);
}

#[test]
fn missing_item_counts() {
    let errors = assert_violates(&json!({ "type": "array" }), &json!({ "type": "array", "maxItems": 11 }));
    assert!(errors.mentions("input maxItems is more than target"));
    let errors = assert_violates(&json!({ "type": "array" }), &json!({ "type": "array", "minItems": 11 }));
    assert!(errors.mentions("input minItems is less than target"));
}

#[test]
fn unconstrained_items_against_item_schema() {
    assert_violates(&json!({ "type": "array" }), &json!({ "type": "array", "items": { "type": "string" } }));
    assert_satisfies(
        &json!({ "type": "array", "items": { "type": "string" } }),
        &json!({ "type": "array" }),
    );
}

#[test]
fn empty_arrays_satisfy_any_item_shape() {
    assert_satisfies(
        &json!({ "type": "array", "maxItems": 0 }),
        &json!({ "type": "array", "items": { "type": "string" } }),
    );
}

#[test]
fn tuples() {
    let pair = json!({ "type": "array", "items": [{ "type": "string" }, { "type": "integer" }] });
    assert_satisfies(
        &pair,
        &json!({ "type": "array", "items": [{ "type": "string" }, { "type": "number" }] }),
    );
    assert_satisfies(&pair, &json!({ "type": "array", "items": { "type": ["string", "integer"] } }));
    assert_satisfies(&pair, &json!({ "type": "array", "minItems": 2, "maxItems": 2 }));

    let errors = assert_violates(
        &pair,
        &json!({ "type": "array", "items": [{ "type": "string" }] }),
    );
    assert!(errors.mentions("Tuple item count mismatch"));

    let errors = assert_violates(&pair, &json!({ "type": "array", "items": { "type": "string" } }));
    assert!(errors.mentions("Tuple items mismatch"));
    assert_eq!(errors.first().paths.input_pointer(), "/items/1");
    assert_eq!(errors.first().paths.target_pointer(), "/items");

    assert_violates(
        &json!({ "type": "array", "items": { "type": "string" } }),
        &json!({ "type": "array", "items": [{ "type": "string" }] }),
    );
}

#[test]
fn unique_items() {
    assert_satisfies(
        &json!({ "type": "array", "uniqueItems": true, "maxItems": 3 }),
        &json!({ "type": "array", "uniqueItems": true }),
    );
    let errors = assert_violates(&json!({ "type": "array" }), &json!({ "type": "array", "uniqueItems": true }));
    assert!(errors.mentions("uniqueItems"));
}
