//! # Comparison Options
//!
//! [`CompatOptions`] carries the two semantic relaxations of the subset
//! check plus the knobs of the preprocessing pipeline. Defaults match the
//! strict reading: no partial inputs, no extra properties, references
//! inlined, draft 7 assumed for a target without a recognized `$schema`.

use std::fmt;
use std::sync::Arc;

use jsc_core::DEFAULT_MAX_DEPTH;
use serde_json::Value;

use crate::oracle::{JsonSchemaOracle, ValueOracle};
use crate::preprocess::SchemaRegistry;

/// JSON Schema dialects the value oracle can evaluate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Draft {
    /// Draft 6.
    Draft6,
    /// Draft 7, the default fallback.
    #[default]
    Draft7,
    /// Draft 2019-09.
    Draft201909,
    /// Draft 2020-12.
    Draft202012,
}

impl Draft {
    /// Recognize a `$schema` URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        if uri.contains("draft-06/") {
            Some(Self::Draft6)
        } else if uri.contains("draft-07/") {
            Some(Self::Draft7)
        } else if uri.contains("2019-09/") {
            Some(Self::Draft201909)
        } else if uri.contains("2020-12/") {
            Some(Self::Draft202012)
        } else {
            None
        }
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft6 => "draft-06",
            Self::Draft7 => "draft-07",
            Self::Draft201909 => "2019-09",
            Self::Draft202012 => "2020-12",
        })
    }
}

impl From<Draft> for jsonschema::Draft {
    fn from(d: Draft) -> Self {
        match d {
            Draft::Draft6 => jsonschema::Draft::Draft6,
            Draft::Draft7 => jsonschema::Draft::Draft7,
            Draft::Draft201909 => jsonschema::Draft::Draft201909,
            Draft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// Options for [`crate::check`] and friends.
#[derive(Debug, Clone)]
pub struct CompatOptions {
    /// Skip the required-property check: the input may describe a
    /// partial object.
    pub allow_partial: bool,
    /// Let the input declare properties a closed target
    /// (`additionalProperties: false`) does not.
    pub allow_additional_props: bool,
    /// Inline `$ref` before comparing. When off, any surviving `$ref`
    /// that is not structurally identical on both sides fails the check.
    pub dereference: bool,
    /// Nesting limit for parsing either operand.
    pub max_depth: usize,
    /// Dialect the default value oracle assumes when the target declares
    /// no recognized `$schema`.
    pub draft: Draft,
    registry: SchemaRegistry,
    oracle: Option<Arc<dyn ValueOracle>>,
}

impl Default for CompatOptions {
    fn default() -> Self {
        Self {
            allow_partial: false,
            allow_additional_props: false,
            dereference: true,
            max_depth: DEFAULT_MAX_DEPTH,
            draft: Draft::default(),
            registry: SchemaRegistry::new(),
            oracle: None,
        }
    }
}

impl CompatOptions {
    /// Strict defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle [`CompatOptions::allow_partial`].
    pub fn with_allow_partial(mut self, allow: bool) -> Self {
        self.allow_partial = allow;
        self
    }

    /// Toggle [`CompatOptions::allow_additional_props`].
    pub fn with_allow_additional_props(mut self, allow: bool) -> Self {
        self.allow_additional_props = allow;
        self
    }

    /// Toggle [`CompatOptions::dereference`].
    pub fn with_dereference(mut self, dereference: bool) -> Self {
        self.dereference = dereference;
        self
    }

    /// Set [`CompatOptions::max_depth`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the fallback dialect of the default oracle.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = draft;
        self
    }

    /// Make an external document resolvable by `$ref`.
    pub fn with_document(mut self, uri: impl Into<String>, document: Value) -> Self {
        self.registry.insert(uri, document);
        self
    }

    /// Replace the default `jsonschema`-backed oracle.
    pub fn with_oracle(mut self, oracle: Arc<dyn ValueOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Documents registered with [`CompatOptions::with_document`].
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// [`CompatOptions::oracle_for`] the fallback draft.
    pub fn oracle(&self) -> Arc<dyn ValueOracle> {
        self.oracle_for(self.draft)
    }

    /// The configured oracle, or a [`JsonSchemaOracle`] for `draft` that
    /// resolves references against the registry. A configured oracle
    /// ignores `draft`.
    pub fn oracle_for(&self, draft: Draft) -> Arc<dyn ValueOracle> {
        match &self.oracle {
            Some(o) => Arc::clone(o),
            None => Arc::new(JsonSchemaOracle::new(draft).with_registry(self.registry.clone())),
        }
    }
}
