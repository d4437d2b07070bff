//! Dialect gate: refuse schemas that declare a pre-draft-5 `$schema`.

use std::sync::OnceLock;

use jsc_core::{Operand, UsageError};
use regex::Regex;
use serde_json::Value;

fn legacy_dialect() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"draft-0[1234]/schema").expect("legacy dialect regex must compile"))
}

/// The `$schema` URI an operand declares, `None` when it declares none.
///
/// # Errors
///
/// `UnsupportedDialect` for drafts 1 through 4, `MalformedSchema` when
/// `$schema` is not a string.
pub fn check_dialect(operand: Operand, schema: &Value) -> Result<Option<String>, UsageError> {
    let declared = match schema.get("$schema") {
        None => return Ok(None),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(UsageError::MalformedSchema {
                operand,
                reason: format!("'$schema' must be a string, found {other}"),
            })
        }
    };
    if legacy_dialect().is_match(declared) {
        return Err(UsageError::UnsupportedDialect {
            operand,
            dialect: declared.clone(),
        });
    }
    Ok(Some(declared.clone()))
}
