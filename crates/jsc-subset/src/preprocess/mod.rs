//! # Preprocessing Pipeline
//!
//! Both operands pass the gates before either is transformed:
//!
//! 1. **Dialect gate** ([`check_dialect`]): pre-draft-5 `$schema` values
//!    are refused, input first, then target.
//! 2. **Well-formedness** ([`check_well_formed`]): the top level must say
//!    something the comparator can reason about.
//!
//! Each operand then goes through [`normalize`]:
//!
//! 3. **Depth check** ([`check_depth`]): nesting is measured without
//!    recursion before any recursive step runs.
//! 4. **Dereference** ([`LocalDereferencer`]): `$ref` is inlined.
//! 5. **`allOf` folding** ([`merge_all_of`]), only when an `allOf` occurs.
//! 6. **Metadata strip** ([`strip_metadata`]): top-level `$`-prefixed keys
//!    are dropped.
//! 7. **Parse** into a [`SchemaNode`] under the depth limit.
//!
//! The caller's values are never modified; every step produces a copy.

pub mod deref;
pub mod dialect;
pub mod merge;

use jsc_core::{check_depth, Operand, SchemaNode, UsageError};
use serde_json::{Map, Value};
use tracing::debug;

use crate::options::{CompatOptions, Draft};

// Re-export primary types for ergonomic imports.
pub use deref::{Dereference, LocalDereferencer, SchemaRegistry};
pub use dialect::check_dialect;
pub use merge::{conjoin, contains_all_of, merge_all_of};

pub(crate) use jsc_core::schema::{DEFINITION_KEYS, SCHEMA_KEYS, SCHEMA_LIST_KEYS, SCHEMA_MAP_KEYS};

/// Keywords that make a top-level schema meaningful on their own.
const ANCHOR_KEYS: &[&str] = &["type", "anyOf", "allOf", "oneOf", "not", "const", "enum", "$ref"];

/// Reject a top-level operand that is neither a boolean nor an object
/// carrying a type, a combinator, a literal restriction or a reference.
/// An object with only `$`-prefixed members is the open schema and passes.
///
/// # Errors
///
/// `MalformedSchema` naming the operand.
pub fn check_well_formed(operand: Operand, schema: &Value) -> Result<(), UsageError> {
    let map = match schema {
        Value::Bool(_) => return Ok(()),
        Value::Object(map) => map,
        other => {
            return Err(UsageError::MalformedSchema {
                operand,
                reason: format!("expected an object or boolean, found {other}"),
            })
        }
    };
    if map.keys().all(|k| k.starts_with('$')) || ANCHOR_KEYS.iter().any(|k| map.contains_key(*k)) {
        return Ok(());
    }
    Err(UsageError::MalformedSchema {
        operand,
        reason: "a schema must declare 'type', a combinator or 'const'".to_string(),
    })
}

/// Drop `$`-prefixed members (`$schema`, `$id`, `$comment`, ...) from the
/// top level. `$ref` survives so an unresolved reference stays visible.
pub fn strip_metadata(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !k.starts_with('$') || k.as_str() == "$ref")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<_, _>>(),
        ),
        other => other.clone(),
    }
}

/// The `$schema` each operand declares, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialects {
    /// Declared by the input.
    pub input: Option<String>,
    /// Declared by the target.
    pub target: Option<String>,
}

impl Dialects {
    /// The draft target-side schemas are evaluated under: the target's
    /// declared dialect when recognized, else `fallback`.
    pub fn target_draft(&self, fallback: Draft) -> Draft {
        self.target.as_deref().and_then(Draft::from_uri).unwrap_or(fallback)
    }
}

/// Run the gates on both operands: both dialects, then both shapes.
///
/// # Errors
///
/// Dialect and well-formedness failures, naming the operand.
pub fn gate(input: &Value, target: &Value) -> Result<Dialects, UsageError> {
    let dialects = Dialects {
        input: check_dialect(Operand::Input, input)?,
        target: check_dialect(Operand::Target, target)?,
    };
    check_well_formed(Operand::Input, input)?;
    check_well_formed(Operand::Target, target)?;
    debug!(input = ?dialects.input, target = ?dialects.target, "operands passed preprocessing gates");
    Ok(dialects)
}

/// Dereference, fold, strip and parse one operand that already passed
/// [`gate`].
///
/// # Errors
///
/// Reference and depth failures, and keywords of the wrong shape.
pub fn normalize(operand: Operand, schema: &Value, options: &CompatOptions) -> Result<SchemaNode, UsageError> {
    check_depth(schema, options.max_depth)?;
    let mut value = if options.dereference {
        LocalDereferencer::new(options.registry())
            .with_max_depth(options.max_depth)
            .dereference(schema)?
    } else {
        schema.clone()
    };
    if contains_all_of(&value) {
        debug!(%operand, "folding allOf");
        value = merge_all_of(&value);
    }
    let value = strip_metadata(&value);
    SchemaNode::parse(&value, options.max_depth)
}
