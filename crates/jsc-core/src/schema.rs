//! # Schema Model — Typed Keyword Representation
//!
//! A [`SchemaNode`] is parsed once from a `serde_json::Value`. Every
//! keyword the comparator understands becomes an explicit optional field,
//! so the comparison rules never probe a raw JSON object for presence.
//!
//! The cleaned source value is retained in [`SchemaNode::raw`]. It backs
//! structural equality (the comparator's trivial-acceptance shortcut) and
//! is what the value oracle evaluates literals against.
//!
//! ## Boolean Schemas
//!
//! `true` parses as the empty schema and `false` as `{"not": {}}`.
//!
//! ## Opaque Keywords
//!
//! Constraining keywords outside the model (`minProperties`, `contains`,
//! `if`, ...) are kept verbatim in [`SchemaNode::opaque`]. They still
//! count as constraints, so a node carrying one is never unconstrained.
//!
//! ## Depth Guard
//!
//! Parsing is recursive. [`check_depth`] measures nesting with an explicit
//! work-list, and [`SchemaNode::parse`] runs it first, so a document
//! nested deeper than the caller's limit is rejected with
//! [`UsageError::DepthExceeded`] before any recursion starts. Comparison
//! recursion is bounded by the parsed depth.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::{Map, Value};

use crate::decimal::Decimal;
use crate::error::UsageError;

/// Default nesting limit used by [`SchemaNode::from_value`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Keywords whose value is one subschema.
pub const SCHEMA_KEYS: &[&str] = &[
    "not",
    "items",
    "additionalItems",
    "additionalProperties",
    "unevaluatedItems",
    "unevaluatedProperties",
    "contains",
    "propertyNames",
    "if",
    "then",
    "else",
];

/// Keywords whose value is an array of subschemas.
pub const SCHEMA_LIST_KEYS: &[&str] = &["allOf", "anyOf", "oneOf", "items", "prefixItems"];

/// Keywords whose value maps names to subschemas.
pub const SCHEMA_MAP_KEYS: &[&str] = &["properties", "patternProperties", "dependencies", "dependentSchemas"];

/// Definition containers.
pub const DEFINITION_KEYS: &[&str] = &["definitions", "$defs"];

/// Constraining keywords kept verbatim in [`SchemaNode::opaque`].
pub const OPAQUE_KEYS: &[&str] = &[
    "minProperties",
    "maxProperties",
    "patternProperties",
    "propertyNames",
    "dependencies",
    "dependentRequired",
    "dependentSchemas",
    "unevaluatedProperties",
    "contains",
    "minContains",
    "maxContains",
    "additionalItems",
    "prefixItems",
    "unevaluatedItems",
    "if",
    "then",
    "else",
];

/// Reject `value` when any subschema, definitions included, sits more
/// than `max_depth` levels below the root.
///
/// # Errors
///
/// `UsageError::DepthExceeded`.
pub fn check_depth(value: &Value, max_depth: usize) -> Result<(), UsageError> {
    let mut pending = vec![(value, 0usize)];
    while let Some((node, depth)) = pending.pop() {
        if depth > max_depth {
            return Err(UsageError::DepthExceeded { limit: max_depth });
        }
        let Value::Object(map) = node else {
            continue;
        };
        let child = depth + 1;
        for (key, v) in map {
            let k = key.as_str();
            match v {
                Value::Array(list) if SCHEMA_LIST_KEYS.contains(&k) => {
                    pending.extend(list.iter().filter(|s| is_schema(s)).map(|s| (s, child)));
                }
                Value::Object(members) if SCHEMA_MAP_KEYS.contains(&k) || DEFINITION_KEYS.contains(&k) => {
                    pending.extend(members.values().filter(|s| is_schema(s)).map(|s| (s, child)));
                }
                _ if SCHEMA_KEYS.contains(&k) && is_schema(v) => pending.push((v, child)),
                _ => {}
            }
        }
    }
    Ok(())
}

fn is_schema(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Bool(_))
}

/// The seven JSON Schema primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeName {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl TypeName {
    /// Parse a `type` keyword entry.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "null" => Self::Null,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "string" => Self::String,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => return None,
        })
    }

    /// Keyword spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Type of a JSON literal. Integral numbers report `Integer`.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Self::Integer,
                _ => Self::Number,
            },
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// True when every value of `self` is also a value of `other`.
    /// Numeric widening (`integer` into `number`) is the only coercion.
    pub fn is_within(self, other: TypeName) -> bool {
        self == other || (self == Self::Integer && other == Self::Number)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` keyword: one name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSet(BTreeSet<TypeName>);

impl TypeSet {
    /// A set holding one type.
    pub fn single(name: TypeName) -> Self {
        Self(BTreeSet::from([name]))
    }

    /// Build from any iterator of names.
    pub fn from_names(names: impl IntoIterator<Item = TypeName>) -> Self {
        Self(names.into_iter().collect())
    }

    /// True when `name` is listed.
    pub fn contains(&self, name: TypeName) -> bool {
        self.0.contains(&name)
    }

    /// True when `name` is listed, or `name` is `integer` and `number` is.
    pub fn admits(&self, name: TypeName) -> bool {
        self.0.iter().any(|t| name.is_within(*t))
    }

    /// True when every listed type is admitted by `other`.
    pub fn is_within(&self, other: &TypeSet) -> bool {
        self.0.iter().all(|t| other.admits(*t))
    }

    /// Iterate the names.
    pub fn iter(&self) -> impl Iterator<Item = TypeName> + '_ {
        self.0.iter().copied()
    }

    /// Shared members, with `integer ∩ number = integer`.
    pub fn intersect(&self, other: &TypeSet) -> TypeSet {
        let mut out = BTreeSet::new();
        for a in self.iter() {
            for b in other.iter() {
                if a.is_within(b) {
                    out.insert(a);
                } else if b.is_within(a) {
                    out.insert(b);
                }
            }
        }
        TypeSet(out)
    }

    /// True for an empty set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON form: a bare string for one type, else an array.
    pub fn to_value(&self) -> Value {
        if self.0.len() == 1 {
            Value::String(self.iter().map(TypeName::as_str).collect())
        } else {
            Value::Array(
                self.iter()
                    .map(|t| Value::String(t.as_str().to_string()))
                    .collect(),
            )
        }
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() == 1 {
            if let Some(t) = self.0.iter().next() {
                return write!(f, "{t}");
            }
        }
        let names: Vec<&str> = self.iter().map(TypeName::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// The `items` keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    /// One schema for every element.
    List(Box<SchemaNode>),
    /// Fixed-length positional schemas.
    Tuple(Vec<SchemaNode>),
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `true` or `false`.
    Allowed(bool),
    /// A schema every undeclared member must satisfy.
    Schema(Box<SchemaNode>),
}

/// One parsed schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// `type`.
    pub types: Option<TypeSet>,
    /// `properties`.
    pub properties: BTreeMap<String, SchemaNode>,
    /// `required`.
    pub required: BTreeSet<String>,
    /// `additionalProperties`.
    pub additional_properties: Option<AdditionalProperties>,
    /// `items`.
    pub items: Option<Items>,
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
    /// `uniqueItems`.
    pub unique_items: bool,
    /// `minimum`.
    pub minimum: Option<f64>,
    /// `maximum`.
    pub maximum: Option<f64>,
    /// `exclusiveMinimum` (numeric form, draft 6+).
    pub exclusive_minimum: Option<f64>,
    /// `exclusiveMaximum` (numeric form, draft 6+).
    pub exclusive_maximum: Option<f64>,
    /// `multipleOf`.
    pub multiple_of: Option<Decimal>,
    /// `minLength`.
    pub min_length: Option<u64>,
    /// `maxLength`.
    pub max_length: Option<u64>,
    /// `pattern`.
    pub pattern: Option<String>,
    /// `format`.
    pub format: Option<String>,
    /// `enum`.
    pub enum_values: Option<Vec<Value>>,
    /// `const`; `Some(Value::Null)` for `"const": null`.
    pub const_value: Option<Value>,
    /// `default`.
    pub default: Option<Value>,
    /// `allOf`.
    pub all_of: Option<Vec<SchemaNode>>,
    /// `anyOf`.
    pub any_of: Option<Vec<SchemaNode>>,
    /// `oneOf`.
    pub one_of: Option<Vec<SchemaNode>>,
    /// `not`.
    pub not: Option<Box<SchemaNode>>,
    /// `$schema`.
    pub dialect: Option<String>,
    /// `$ref`, present only when references were not inlined.
    pub reference: Option<String>,
    /// Members of [`OPAQUE_KEYS`], uninterpreted.
    pub opaque: BTreeMap<String, Value>,
    /// The source value this node was parsed from.
    pub raw: Value,
}

impl SchemaNode {
    /// The empty schema `{}`.
    pub fn empty() -> Self {
        Self {
            types: None,
            properties: BTreeMap::new(),
            required: BTreeSet::new(),
            additional_properties: None,
            items: None,
            min_items: None,
            max_items: None,
            unique_items: false,
            minimum: None,
            maximum: None,
            exclusive_minimum: None,
            exclusive_maximum: None,
            multiple_of: None,
            min_length: None,
            max_length: None,
            pattern: None,
            format: None,
            enum_values: None,
            const_value: None,
            default: None,
            all_of: None,
            any_of: None,
            one_of: None,
            not: None,
            dialect: None,
            reference: None,
            opaque: BTreeMap::new(),
            raw: Value::Object(Map::new()),
        }
    }

    /// Parse with [`DEFAULT_MAX_DEPTH`].
    pub fn from_value(value: &Value) -> Result<Self, UsageError> {
        Self::parse(value, DEFAULT_MAX_DEPTH)
    }

    /// Parse, rejecting documents nested deeper than `max_depth`.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::InvalidKeyword` for a keyword of the wrong
    /// shape and `UsageError::DepthExceeded` past the nesting limit.
    pub fn parse(value: &Value, max_depth: usize) -> Result<Self, UsageError> {
        check_depth(value, max_depth)?;
        parse_node(value)
    }

    /// True when the node constrains nothing. Annotation keywords such as
    /// `title`, `description` and `default` do not count.
    pub fn is_unconstrained(&self) -> bool {
        self.types.is_none()
            && self.properties.is_empty()
            && self.required.is_empty()
            && self.additional_properties.is_none()
            && self.items.is_none()
            && self.min_items.is_none()
            && self.max_items.is_none()
            && !self.unique_items
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.exclusive_minimum.is_none()
            && self.exclusive_maximum.is_none()
            && self.multiple_of.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.format.is_none()
            && self.enum_values.is_none()
            && self.const_value.is_none()
            && self.reference.is_none()
            && self.opaque.is_empty()
            && !self.has_combinator()
    }

    /// True for a schema no value satisfies, such as `false` or
    /// `{"not": {}}`.
    pub fn is_never(&self) -> bool {
        self.not.as_ref().is_some_and(|n| n.is_unconstrained())
    }

    /// True when any of `allOf`/`anyOf`/`oneOf`/`not` is declared.
    pub fn has_combinator(&self) -> bool {
        self.all_of.is_some() || self.any_of.is_some() || self.one_of.is_some() || self.not.is_some()
    }

    /// True when `type` lists `name` (with integer-into-number widening).
    pub fn declares_type(&self, name: TypeName) -> bool {
        self.types.as_ref().is_some_and(|t| t.admits(name))
    }

    /// The literal values this node is restricted to: `const`, else `enum`.
    pub fn literal_values(&self) -> Option<Vec<&Value>> {
        if let Some(c) = &self.const_value {
            return Some(vec![c]);
        }
        self.enum_values.as_ref().map(|e| e.iter().collect())
    }

    /// The declared type set, or one inferred from `const`/`enum` literals.
    pub fn effective_types(&self) -> Option<TypeSet> {
        if let Some(t) = &self.types {
            return Some(t.clone());
        }
        let literals = self.literal_values()?;
        if literals.is_empty() {
            return None;
        }
        Some(TypeSet::from_names(literals.into_iter().map(TypeName::of_value)))
    }

    /// A copy without `anyOf`.
    pub fn without_any_of(&self) -> Self {
        let mut next = self.clone();
        next.any_of = None;
        next.remove_raw("anyOf");
        next
    }

    /// A copy without `allOf`.
    pub fn without_all_of(&self) -> Self {
        let mut next = self.clone();
        next.all_of = None;
        next.remove_raw("allOf");
        next
    }

    /// A copy without `oneOf`.
    pub fn without_one_of(&self) -> Self {
        let mut next = self.clone();
        next.one_of = None;
        next.remove_raw("oneOf");
        next
    }

    fn remove_raw(&mut self, key: &str) {
        if let Value::Object(map) = &mut self.raw {
            map.remove(key);
        }
    }
}

impl Default for SchemaNode {
    fn default() -> Self {
        Self::empty()
    }
}

/// Recursive descent; callers bound the depth with [`check_depth`] first.
fn parse_node(value: &Value) -> Result<SchemaNode, UsageError> {
    let map = match value {
        Value::Object(map) => map,
        Value::Bool(true) => return Ok(SchemaNode::empty()),
        Value::Bool(false) => {
            let mut node = SchemaNode::empty();
            node.not = Some(Box::new(SchemaNode::empty()));
            node.raw = serde_json::json!({ "not": {} });
            return Ok(node);
        }
        other => {
            return Err(UsageError::InvalidKeyword {
                keyword: "(schema)".to_string(),
                reason: format!("expected an object or boolean, found {other}"),
            })
        }
    };

    let mut node = SchemaNode::empty();
    node.raw = value.clone();

    if let Some(t) = map.get("type") {
        node.types = Some(parse_types(t)?);
    }
    if let Some(props) = map.get("properties") {
        let props = props.as_object().ok_or_else(|| invalid("properties", "expected an object"))?;
        for (name, schema) in props {
            node.properties.insert(name.clone(), parse_node(schema)?);
        }
    }
    if let Some(req) = map.get("required") {
        node.required = string_list("required", req)?.into_iter().collect();
    }
    if let Some(ap) = map.get("additionalProperties") {
        node.additional_properties = Some(match ap {
            Value::Bool(b) => AdditionalProperties::Allowed(*b),
            other => AdditionalProperties::Schema(Box::new(parse_node(other)?)),
        });
    }
    if let Some(items) = map.get("items") {
        node.items = Some(match items {
            Value::Array(list) => Items::Tuple(list.iter().map(parse_node).collect::<Result<_, _>>()?),
            other => Items::List(Box::new(parse_node(other)?)),
        });
    }
    node.min_items = count(map, "minItems")?;
    node.max_items = count(map, "maxItems")?;
    if let Some(u) = map.get("uniqueItems") {
        node.unique_items = u.as_bool().ok_or_else(|| invalid("uniqueItems", "expected a boolean"))?;
    }
    node.minimum = number(map, "minimum")?;
    node.maximum = number(map, "maximum")?;
    node.exclusive_minimum = exclusive_bound(map, "exclusiveMinimum")?;
    node.exclusive_maximum = exclusive_bound(map, "exclusiveMaximum")?;
    if let Some(m) = map.get("multipleOf") {
        let step = match m {
            Value::Number(n) => Decimal::from_number(n),
            _ => None,
        }
        .ok_or_else(|| invalid("multipleOf", "expected a finite number"))?;
        if step.to_f64() <= 0.0 {
            return Err(invalid("multipleOf", "must be strictly greater than 0"));
        }
        node.multiple_of = Some(step);
    }
    node.min_length = count(map, "minLength")?;
    node.max_length = count(map, "maxLength")?;
    node.pattern = string(map, "pattern")?;
    node.format = string(map, "format")?;
    if let Some(e) = map.get("enum") {
        let values = e.as_array().ok_or_else(|| invalid("enum", "expected an array"))?;
        node.enum_values = Some(values.clone());
    }
    node.const_value = map.get("const").cloned();
    node.default = map.get("default").cloned();
    node.all_of = branches(map, "allOf")?;
    node.any_of = branches(map, "anyOf")?;
    node.one_of = branches(map, "oneOf")?;
    if let Some(n) = map.get("not") {
        node.not = Some(Box::new(parse_node(n)?));
    }
    node.dialect = string(map, "$schema")?;
    node.reference = string(map, "$ref")?;
    for key in OPAQUE_KEYS {
        if let Some(v) = map.get(*key) {
            node.opaque.insert((*key).to_string(), v.clone());
        }
    }

    Ok(node)
}

fn branches(map: &Map<String, Value>, keyword: &str) -> Result<Option<Vec<SchemaNode>>, UsageError> {
    let Some(v) = map.get(keyword) else {
        return Ok(None);
    };
    let list = v.as_array().ok_or_else(|| invalid(keyword, "expected an array of schemas"))?;
    if list.is_empty() {
        return Err(invalid(keyword, "must list at least one schema"));
    }
    list.iter().map(parse_node).collect::<Result<Vec<_>, _>>().map(Some)
}

fn invalid(keyword: &str, reason: impl Into<String>) -> UsageError {
    UsageError::InvalidKeyword {
        keyword: keyword.to_string(),
        reason: reason.into(),
    }
}

fn parse_types(value: &Value) -> Result<TypeSet, UsageError> {
    let names = match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(_) => string_list("type", value)?,
        _ => return Err(invalid("type", "expected a string or array of strings")),
    };
    let mut set = BTreeSet::new();
    for name in names {
        let t = TypeName::parse(&name).ok_or_else(|| invalid("type", format!("unknown type '{name}'")))?;
        set.insert(t);
    }
    if set.is_empty() {
        return Err(invalid("type", "must name at least one type"));
    }
    Ok(TypeSet(set))
}

fn string_list(keyword: &str, value: &Value) -> Result<Vec<String>, UsageError> {
    value
        .as_array()
        .ok_or_else(|| invalid(keyword, "expected an array of strings"))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(keyword, format!("expected a string, found {v}")))
        })
        .collect()
}

fn string(map: &Map<String, Value>, keyword: &str) -> Result<Option<String>, UsageError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(keyword, "expected a string")),
    }
}

fn number(map: &Map<String, Value>, keyword: &str) -> Result<Option<f64>, UsageError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(keyword, "expected a number")),
    }
}

fn count(map: &Map<String, Value>, keyword: &str) -> Result<Option<u64>, UsageError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(v) => {
            if let Some(n) = v.as_u64() {
                return Ok(Some(n));
            }
            // `2.0` is a valid non-negative integer in JSON Schema.
            match v.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(Some(f as u64)),
                _ => Err(invalid(keyword, "expected a non-negative integer")),
            }
        }
    }
}

fn exclusive_bound(map: &Map<String, Value>, keyword: &str) -> Result<Option<f64>, UsageError> {
    match map.get(keyword) {
        Some(Value::Bool(_)) => Err(invalid(
            keyword,
            "boolean form belongs to draft 4; use a numeric bound",
        )),
        _ => number(map, keyword),
    }
}
