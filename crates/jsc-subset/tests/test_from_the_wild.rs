//! # Real-World Schemas
//!
//! Pairs taken from production schema registries that exposed bugs in
//! earlier subset checkers.

mod common;

use common::{assert_satisfies, assert_satisfies_with};
use jsc_subset::CompatOptions;
use serde_json::{json, Value};

#[test]
fn emails() {
    let email = json!({
        "properties": {
            "type": { "enum": ["other", "personal", "work"], "type": "string" },
            "value": { "format": "email", "minLength": 6, "type": "string" }
        },
        "required": ["type", "value"],
        "title": "Email",
        "type": "object"
    });
    assert_satisfies(
        &json!({
            "properties": { "emails": { "items": email.clone(), "type": "array" } },
            "required": ["emails"],
            "type": "object"
        }),
        &json!({
            "type": "object",
            "required": ["emails"],
            "properties": { "emails": { "items": email, "type": "array" } }
        }),
    );
}

#[test]
fn any_of_inputs() {
    let target = json!({
        "type": "object",
        "required": ["foo"],
        "properties": { "foo": { "type": "string" } }
    });
    let with_baz = json!({
        "type": "object",
        "required": ["foo"],
        "properties": { "foo": { "type": "string" }, "baz": { "type": "boolean" } }
    });
    let with_bar = json!({
        "type": "object",
        "required": ["foo"],
        "properties": { "foo": { "type": "string" }, "bar": { "type": "number" } }
    });

    assert_satisfies(&with_baz, &target);
    assert_satisfies(&json!({ "anyOf": [with_baz.clone()] }), &target);
    assert_satisfies(&json!({ "anyOf": [with_baz, with_bar] }), &target);
}

#[test]
fn any_of_with_arrays() {
    let uri_list = json!({ "items": { "format": "uri", "type": "string" }, "type": "array" });
    let input = json!({
        "type": "object",
        "required": ["additions"],
        "properties": {
            "additions": {
                "type": "array",
                "items": {
                    "additionalProperties": false,
                    "required": ["op", "path", "value"],
                    "type": "object",
                    "properties": {
                        "op": { "enum": ["add"], "type": "string" },
                        "path": { "format": "json-pointer", "type": "string" },
                        "value": {
                            "type": "object",
                            "properties": {
                                "addresses": { "items": {}, "type": "array" },
                                "faceIds": { "items": { "type": "string" }, "type": "array" },
                                "urls": {
                                    "properties": { "fb": uri_list.clone(), "li": uri_list },
                                    "required": ["fb", "li"],
                                    "type": "object"
                                }
                            },
                            "required": ["urls", "faceIds", "addresses"]
                        }
                    }
                }
            }
        }
    });
    let operation = json!({
        "type": "object",
        "required": ["path", "value"],
        "properties": {
            "op": { "enum": ["add"], "type": "string" },
            "path": { "format": "json-pointer", "type": "string" },
            "value": {}
        }
    });
    let target = json!({
        "type": "object",
        "required": ["additions"],
        "properties": {
            "additions": {
                "anyOf": [{ "type": "array", "items": operation.clone() }, operation]
            }
        }
    });
    assert_satisfies(&input, &target);
}

#[test]
fn ssn() {
    assert_satisfies(
        &json!({ "maximum": 899999999, "minimum": 1010001, "type": "integer", "title": "SSN" }),
        &json!({ "maximum": 899999999, "minimum": 1010001, "type": "number" }),
    );
}

#[test]
fn zero_length_arrays() {
    assert_satisfies(
        &json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "allOf": [
                {
                    "type": "object",
                    "required": ["searchString"],
                    "properties": { "searchString": { "type": "string" } }
                },
                {
                    "type": "object",
                    "required": ["resultCategory", "searchKeywords"],
                    "properties": {
                        "resultCategory": { "type": "string", "enum": ["ggg"] },
                        "searchKeywords": { "type": "array", "minItems": 0, "maxItems": 0, "items": [] }
                    },
                    "additionalProperties": false
                }
            ]
        }),
        &json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "required": ["searchString"],
            "properties": {
                "passthrough": {},
                "resultCategory": { "type": "string" },
                "searchKeywords": { "items": { "type": "string" }, "type": "array" },
                "searchSites": { "items": { "type": "string" }, "type": "array" },
                "searchString": { "type": "string" }
            }
        }),
    );
}

fn filter() -> Value {
    json!({
        "anyOf": [
            {
                "properties": { "searchString": { "type": "string" } },
                "required": ["searchString"],
                "type": "object"
            },
            {
                "properties": { "searchStrings": { "items": { "type": "string" }, "type": "array" } },
                "required": ["searchStrings"],
                "type": "object"
            }
        ]
    })
}

#[test]
fn partial_all_of_any_of_combinations() {
    let first = json!({
        "properties": { "array": { "type": "array" }, "filter": filter() },
        "required": ["array", "filter"],
        "type": "object"
    });
    let second = json!({
        "type": "object",
        "required": ["filter"],
        "properties": {
            "filter": {
                "type": "object",
                "required": ["searchStrings"],
                "properties": {
                    "searchStrings": {
                        "type": "array",
                        "minItems": 1,
                        "maxItems": 1,
                        "items": { "type": "string", "enum": ["test"] }
                    }
                }
            }
        }
    });
    let target = first.clone();
    let input = json!({ "allOf": [first.clone(), second.clone()] });

    assert_satisfies(&first, &target);
    assert_satisfies_with(
        &second,
        &target,
        &CompatOptions::default()
            .with_allow_partial(true)
            .with_allow_additional_props(true),
    );
    assert_satisfies(&input, &target);
}

#[test]
fn enums_merge_when_one_branch_matches() {
    let branches = json!([
        { "enum": ["1", "2", "3"], "type": "string" },
        { "enum": ["one", "two", "three"], "type": "string" }
    ]);
    assert_satisfies(
        &json!({ "anyOf": branches.clone(), "enum": ["one"], "type": "string" }),
        &json!({ "anyOf": branches }),
    );
}
