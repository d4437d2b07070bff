//! # `allOf` Folding
//!
//! Folds each `allOf` branch into its parent where the result is an
//! equivalent single schema: types intersect, bounds tighten, `required`
//! unions, `enum` intersects, shared properties fold recursively.
//!
//! A branch that cannot be folded without loss (two different `pattern`s,
//! two `anyOf` lists, two `not`s) stays behind in a residual `allOf`, which
//! the combinator rules then handle branch by branch.
//!
//! When one side closes its object (`additionalProperties: false`), every
//! property declared only by the other side can no longer appear and is
//! folded to the `false` schema.

use jsc_core::{Decimal, TypeName, TypeSet};
use serde_json::{json, Map, Number, Value};

use super::{SCHEMA_KEYS, SCHEMA_LIST_KEYS, SCHEMA_MAP_KEYS};

/// Keywords that never constrain validation. The folded schema keeps the
/// parent's value.
const ANNOTATION_KEYS: &[&str] = &[
    "title",
    "description",
    "default",
    "examples",
    "$comment",
    "$id",
    "$schema",
    "readOnly",
    "writeOnly",
    "deprecated",
];

const LOWER_BOUND_KEYS: &[&str] = &[
    "minimum",
    "exclusiveMinimum",
    "minLength",
    "minItems",
    "minProperties",
];

const UPPER_BOUND_KEYS: &[&str] = &[
    "maximum",
    "exclusiveMaximum",
    "maxLength",
    "maxItems",
    "maxProperties",
];

/// True when an `allOf` appears anywhere in the document.
pub fn contains_all_of(schema: &Value) -> bool {
    match schema {
        Value::Object(map) => {
            map.contains_key("allOf")
                || map
                    .iter()
                    .any(|(k, v)| is_schema_position(k) && contains_all_of(v))
        }
        Value::Array(list) => list.iter().any(contains_all_of),
        _ => false,
    }
}

fn is_schema_position(key: &str) -> bool {
    SCHEMA_KEYS.contains(&key) || SCHEMA_LIST_KEYS.contains(&key) || SCHEMA_MAP_KEYS.contains(&key)
}

/// Fold every `allOf` in `schema`, innermost first.
pub fn merge_all_of(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };
    let mut node = Map::new();
    for (key, value) in map {
        node.insert(key.clone(), merge_children(key, value));
    }
    if !matches!(node.get("allOf"), Some(Value::Array(_))) {
        return Value::Object(node);
    }
    let Some(Value::Array(branches)) = node.remove("allOf") else {
        return Value::Object(node);
    };

    let mut residual = Vec::new();
    for branch in branches {
        match branch {
            Value::Object(b) => match fold(&node, &b) {
                Some(folded) => node = folded,
                None => residual.push(Value::Object(b)),
            },
            Value::Bool(true) => {}
            other => residual.push(other),
        }
    }
    if !residual.is_empty() {
        // A folded branch may have brought its own residual `allOf`.
        match node.get_mut("allOf") {
            Some(Value::Array(kept)) => kept.extend(residual),
            _ => {
                node.insert("allOf".to_string(), Value::Array(residual));
            }
        }
    }
    Value::Object(node)
}

fn merge_children(key: &str, value: &Value) -> Value {
    match value {
        Value::Array(list) if SCHEMA_LIST_KEYS.contains(&key) => {
            Value::Array(list.iter().map(merge_all_of).collect())
        }
        Value::Object(members) if SCHEMA_MAP_KEYS.contains(&key) => Value::Object(
            members
                .iter()
                .map(|(name, s)| (name.clone(), merge_all_of(s)))
                .collect(),
        ),
        _ if SCHEMA_KEYS.contains(&key) => merge_all_of(value),
        _ => value.clone(),
    }
}

/// One schema accepting exactly what both `a` and `b` accept. Parts that
/// do not fold stay in a residual `allOf`.
pub fn conjoin(a: &Value, b: &Value) -> Value {
    merge_all_of(&json!({ "allOf": [a, b] }))
}

fn fold(acc: &Map<String, Value>, branch: &Map<String, Value>) -> Option<Map<String, Value>> {
    let mut out = acc.clone();
    for (key, b) in branch {
        let merged = match out.get(key) {
            None => b.clone(),
            Some(a) if a == b => continue,
            Some(a) => merge_keyword(key, a, b)?,
        };
        out.insert(key.clone(), merged);
    }

    for (closed, open) in [(acc, branch), (branch, acc)] {
        if closed.get("additionalProperties") != Some(&Value::Bool(false)) {
            continue;
        }
        let Some(open_props) = open.get("properties").and_then(Value::as_object) else {
            continue;
        };
        let declared = closed.get("properties").and_then(Value::as_object);
        let excluded: Vec<&String> = open_props
            .keys()
            .filter(|name| !declared.is_some_and(|d| d.contains_key(name.as_str())))
            .collect();
        if excluded.is_empty() {
            continue;
        }
        if closed.contains_key("patternProperties") {
            return None;
        }
        if let Some(Value::Object(props)) = out.get_mut("properties") {
            for name in excluded {
                props.insert(name.clone(), Value::Bool(false));
            }
        }
    }
    Some(out)
}

fn merge_keyword(key: &str, a: &Value, b: &Value) -> Option<Value> {
    if ANNOTATION_KEYS.contains(&key) {
        return Some(a.clone());
    }
    if LOWER_BOUND_KEYS.contains(&key) {
        return pick_number(a, b, |x, y| x >= y);
    }
    if UPPER_BOUND_KEYS.contains(&key) {
        return pick_number(a, b, |x, y| x <= y);
    }
    match key {
        "type" => {
            let both = type_set(a)?.intersect(&type_set(b)?);
            (!both.is_empty()).then(|| both.to_value())
        }
        "properties" => {
            let (a, b) = (a.as_object()?, b.as_object()?);
            let mut out = a.clone();
            for (name, schema) in b {
                let merged = match a.get(name) {
                    Some(existing) if existing != schema => conjoin(existing, schema),
                    _ => schema.clone(),
                };
                out.insert(name.clone(), merged);
            }
            Some(Value::Object(out))
        }
        "required" => {
            let mut names = a.as_array()?.clone();
            for name in b.as_array()? {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            Some(Value::Array(names))
        }
        "enum" => {
            let other = b.as_array()?;
            let shared: Vec<Value> = a.as_array()?.iter().filter(|v| other.contains(v)).cloned().collect();
            (!shared.is_empty()).then_some(Value::Array(shared))
        }
        "uniqueItems" => Some(Value::Bool(a.as_bool()? || b.as_bool()?)),
        "additionalProperties" => match (a, b) {
            (Value::Bool(false), _) | (_, Value::Bool(false)) => Some(Value::Bool(false)),
            (Value::Bool(true), other) | (other, Value::Bool(true)) => Some(other.clone()),
            _ => Some(conjoin(a, b)),
        },
        "items" | "propertyNames" | "contains" if a.is_object() && b.is_object() => Some(conjoin(a, b)),
        "multipleOf" => {
            let (Value::Number(x), Value::Number(y)) = (a, b) else {
                return None;
            };
            let step = Decimal::from_number(x)?.lcm(Decimal::from_number(y)?)?;
            serde_json::from_str::<Number>(&step.to_string()).ok().map(Value::Number)
        }
        _ => None,
    }
}

fn pick_number(a: &Value, b: &Value, keep_a: impl Fn(f64, f64) -> bool) -> Option<Value> {
    let (x, y) = (a.as_f64()?, b.as_f64()?);
    Some(if keep_a(x, y) { a.clone() } else { b.clone() })
}

fn type_set(value: &Value) -> Option<TypeSet> {
    let names: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(list) => list.iter().map(Value::as_str).collect::<Option<_>>()?,
        _ => return None,
    };
    names
        .into_iter()
        .map(TypeName::parse)
        .collect::<Option<Vec<_>>>()
        .map(TypeSet::from_names)
}
