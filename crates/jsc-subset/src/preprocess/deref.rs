//! # Reference Inlining
//!
//! Replaces every `$ref` with a copy of the schema it points at, so the
//! comparator only ever sees self-contained trees.
//!
//! Internal references (`#/definitions/x`) resolve against the document
//! they appear in. External references resolve against documents in a
//! [`SchemaRegistry`], looked up by full URI first, then by file name.
//! Nothing is fetched from disk or the network.
//!
//! Recursive schemas cannot be inlined into a finite tree; a reference
//! that is reached again while it is still being expanded fails with
//! `UsageError::CyclicReference`. `definitions` and `$defs` blocks are
//! dropped from the output once their uses have been inlined.
//!
//! Inlining can nest a tree deeper than its source; the output is held to
//! the same depth limit as the parser.

use std::collections::BTreeMap;
use std::sync::Arc;

use jsc_core::{UsageError, DEFAULT_MAX_DEPTH};
use serde_json::{Map, Value};
use tracing::{trace, warn};

use super::{DEFINITION_KEYS, SCHEMA_KEYS, SCHEMA_LIST_KEYS, SCHEMA_MAP_KEYS};

/// Documents that external `$ref` values may point at.
///
/// Cloning is cheap; the map is shared until the next insert.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    documents: Arc<BTreeMap<String, Value>>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `uri`, and under its `$id` when it
    /// declares a different one.
    pub fn insert(&mut self, uri: impl Into<String>, document: Value) {
        let uri = uri.into();
        let documents = Arc::make_mut(&mut self.documents);
        if let Some(id) = document.get("$id").and_then(Value::as_str) {
            let id = id.trim_end_matches('#');
            if id != uri {
                documents.insert(id.to_string(), document.clone());
            }
        }
        documents.insert(uri.trim_end_matches('#').to_string(), document);
    }

    /// Look up a document: exact URI, then any registered URI with the
    /// same file name.
    pub fn get(&self, uri: &str) -> Option<&Value> {
        let uri = uri.trim_end_matches('#');
        if let Some(doc) = self.documents.get(uri) {
            return Some(doc);
        }
        let filename = file_name(uri);
        self.documents
            .iter()
            .find(|(key, _)| file_name(key) == filename)
            .map(|(_, doc)| doc)
    }

    /// Number of registered URIs.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn file_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Produces a reference-free copy of a schema.
pub trait Dereference {
    /// Inline every `$ref` in `schema`.
    ///
    /// # Errors
    ///
    /// `UnresolvedReference` for a pointer or document that does not
    /// exist, `CyclicReference` for a recursive chain.
    fn dereference(&self, schema: &Value) -> Result<Value, UsageError>;
}

/// [`Dereference`] over the operand itself plus a [`SchemaRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct LocalDereferencer<'a> {
    registry: &'a SchemaRegistry,
    max_depth: usize,
}

impl<'a> LocalDereferencer<'a> {
    /// Resolve external documents from `registry`.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Fail with `DepthExceeded` when the inlined tree nests deeper than
    /// `max_depth`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// The document a reference is resolved against.
#[derive(Clone)]
struct Scope<'v> {
    base: String,
    root: &'v Value,
}

impl Dereference for LocalDereferencer<'_> {
    fn dereference(&self, schema: &Value) -> Result<Value, UsageError> {
        let scope = Scope {
            base: String::new(),
            root: schema,
        };
        let mut active = Vec::new();
        self.schema(schema, &scope, &mut active, 0)
    }
}

impl<'a> LocalDereferencer<'a> {
    fn schema<'v>(
        &self,
        node: &'v Value,
        scope: &Scope<'v>,
        active: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, UsageError>
    where
        'a: 'v,
    {
        if depth > self.max_depth {
            return Err(UsageError::DepthExceeded { limit: self.max_depth });
        }
        let Value::Object(map) = node else {
            return Ok(node.clone());
        };
        if let Some(Value::String(reference)) = map.get("$ref") {
            return self.follow(reference, map, scope, active, depth);
        }
        let child = depth + 1;

        let mut out = Map::new();
        for (key, value) in map {
            let k = key.as_str();
            if DEFINITION_KEYS.contains(&k) {
                continue;
            }
            let resolved = match value {
                Value::Array(list) if SCHEMA_LIST_KEYS.contains(&k) => Value::Array(
                    list.iter()
                        .map(|s| self.schema(s, scope, active, child))
                        .collect::<Result<_, _>>()?,
                ),
                Value::Object(members) if SCHEMA_MAP_KEYS.contains(&k) => {
                    let mut resolved = Map::new();
                    for (name, s) in members {
                        resolved.insert(name.clone(), self.schema(s, scope, active, child)?);
                    }
                    Value::Object(resolved)
                }
                _ if SCHEMA_KEYS.contains(&k) => self.schema(value, scope, active, child)?,
                _ => value.clone(),
            };
            out.insert(key.clone(), resolved);
        }
        Ok(Value::Object(out))
    }

    fn follow<'v>(
        &self,
        reference: &str,
        map: &Map<String, Value>,
        scope: &Scope<'v>,
        active: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, UsageError>
    where
        'a: 'v,
    {
        let key = if reference.starts_with('#') {
            format!("{}{reference}", scope.base)
        } else {
            reference.to_string()
        };
        if active.contains(&key) {
            return Err(UsageError::CyclicReference {
                reference: reference.to_string(),
            });
        }
        if map.len() > 1 {
            warn!(reference, "keywords beside $ref are ignored");
        }

        let (target, next) = self.lookup(reference, scope)?;
        trace!(reference, base = %next.base, "inlining reference");
        active.push(key);
        let inlined = self.schema(target, &next, active, depth);
        active.pop();
        inlined
    }

    fn lookup<'v>(&self, reference: &str, scope: &Scope<'v>) -> Result<(&'v Value, Scope<'v>), UsageError>
    where
        'a: 'v,
    {
        let unresolved = || UsageError::UnresolvedReference {
            reference: reference.to_string(),
        };
        let (document, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        let next = if document.is_empty() {
            scope.clone()
        } else {
            let registry: &'a SchemaRegistry = self.registry;
            Scope {
                base: document.to_string(),
                root: registry.get(document).ok_or_else(unresolved)?,
            }
        };
        let target = if fragment.is_empty() {
            next.root
        } else if fragment.starts_with('/') {
            next.root.pointer(fragment).ok_or_else(unresolved)?
        } else {
            // Plain-name anchors are not supported.
            return Err(unresolved());
        };
        Ok((target, next))
    }
}
