//! # Value Oracle
//!
//! Some questions the structural rules cannot answer on their own: does
//! the literal `"vainglory"` satisfy `format: uri`? Is `const: 5`
//! accepted by a target with `multipleOf: 2.5`? The comparator hands those
//! to a [`ValueOracle`], which validates concrete values against a schema.
//!
//! The default [`JsonSchemaOracle`] compiles the schema with the
//! `jsonschema` crate. References that survive preprocessing are resolved
//! from the [`SchemaRegistry`] only; nothing is fetched over the network.

use std::fmt;

use jsc_core::UsageError;
use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use tracing::trace;

use crate::options::Draft;
use crate::preprocess::SchemaRegistry;

/// Validates concrete JSON values against a schema.
pub trait ValueOracle: Send + Sync + fmt::Debug {
    /// Index of the first value `schema` rejects, or `None` when every
    /// value is accepted.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::Oracle` when `schema` cannot be compiled.
    fn first_rejected(&self, schema: &Value, values: &[&Value]) -> Result<Option<usize>, UsageError>;

    /// Whether `schema` accepts `value`.
    fn accepts(&self, schema: &Value, value: &Value) -> Result<bool, UsageError> {
        Ok(self.first_rejected(schema, &[value])?.is_none())
    }
}

/// [`ValueOracle`] backed by the `jsonschema` crate, with format
/// assertion enabled.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaOracle {
    draft: Draft,
    registry: SchemaRegistry,
}

impl JsonSchemaOracle {
    /// An oracle for `draft` with an empty registry.
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            registry: SchemaRegistry::new(),
        }
    }

    /// Resolve `$ref` from `registry`.
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }
}

impl ValueOracle for JsonSchemaOracle {
    fn first_rejected(&self, schema: &Value, values: &[&Value]) -> Result<Option<usize>, UsageError> {
        let mut opts = jsonschema::options();
        opts.with_draft(self.draft.into());
        opts.should_validate_formats(true);
        opts.with_retriever(RegistryRetriever {
            registry: self.registry.clone(),
        });
        let validator = opts.build(schema).map_err(|e| UsageError::Oracle {
            reason: e.to_string(),
        })?;
        let rejected = values.iter().position(|v| !validator.is_valid(v));
        trace!(checked = values.len(), ?rejected, "oracle evaluated literals");
        Ok(rejected)
    }
}

/// Serves registered documents to the validator. Unknown URIs fail the
/// build rather than being fetched or treated as permissive.
struct RegistryRetriever {
    registry: SchemaRegistry,
}

impl Retrieve for RegistryRetriever {
    fn retrieve(&self, uri: &Uri<&str>) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        match self.registry.get(uri_str) {
            Some(doc) => Ok(doc.clone()),
            None => Err(format!("schema '{uri_str}' is not registered").into()),
        }
    }
}
