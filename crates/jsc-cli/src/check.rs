//! # Check and Self-Check Subcommands
//!
//! Both subcommands build a [`CompatOptions`] from their flags, run
//! [`jsc_subset::check`] and report the verdict. The text report prints
//! one line per trace record, deepest cause first; the JSON report is a
//! single [`Report`] object.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use jsc_core::CompatError;
use jsc_subset::{check, CompatOptions, UsageError, Verdict};

use crate::load::load_schema;
use crate::{EXIT_COMPATIBLE, EXIT_INCOMPATIBLE, EXIT_USAGE};

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object.
    Json,
}

/// Flags shared by `check` and `self-check`.
#[derive(Args, Debug, Clone, Default)]
pub struct CompatFlags {
    /// Skip the required-property check (the input may be partial).
    #[arg(long)]
    pub allow_partial: bool,

    /// Let the input declare properties a closed target does not.
    #[arg(long)]
    pub allow_additional_props: bool,

    /// Compare `$ref` textually instead of inlining it.
    #[arg(long)]
    pub no_dereference: bool,

    /// Nesting limit for either schema.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Register an external document for `$ref` resolution. Repeatable.
    #[arg(long = "ref", value_name = "URI=PATH", value_parser = parse_ref)]
    pub refs: Vec<(String, PathBuf)>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl CompatFlags {
    /// Options for this invocation, with every `--ref` document loaded.
    ///
    /// # Errors
    ///
    /// Fails when a referenced document cannot be loaded.
    pub fn options(&self) -> Result<CompatOptions> {
        let mut options = CompatOptions::new()
            .with_allow_partial(self.allow_partial)
            .with_allow_additional_props(self.allow_additional_props)
            .with_dereference(!self.no_dereference);
        if let Some(depth) = self.max_depth {
            options = options.with_max_depth(depth);
        }
        for (uri, path) in &self.refs {
            let document = load_schema(path).with_context(|| format!("failed to load --ref {uri}"))?;
            tracing::debug!(%uri, path = %path.display(), "registered external document");
            options = options.with_document(uri.clone(), document);
        }
        Ok(options)
    }
}

fn parse_ref(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((uri, path)) if !uri.is_empty() && !path.is_empty() => Ok((uri.to_string(), PathBuf::from(path))),
        _ => Err(format!("expected URI=PATH, got '{s}'")),
    }
}

/// Arguments for `jsc check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Schema whose accepted values must all be accepted by TARGET.
    pub input: PathBuf,

    /// Schema that must accept every value INPUT accepts.
    pub target: PathBuf,

    #[command(flatten)]
    pub flags: CompatFlags,
}

/// Arguments for `jsc self-check`.
#[derive(Args, Debug, Clone)]
pub struct SelfCheckArgs {
    /// Schema to compare against itself.
    pub schema: PathBuf,

    #[command(flatten)]
    pub flags: CompatFlags,
}

/// Machine-readable verdict.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Path of the input document.
    pub input: &'a Path,
    /// Path of the target document.
    pub target: &'a Path,
    /// The verdict.
    pub compatible: bool,
    /// Trace of an incompatible verdict, deepest cause first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a [CompatError]>,
    /// Why the check could not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_error: Option<String>,
}

/// Execute `jsc check`, writing the report to `out`.
///
/// # Errors
///
/// Fails when a schema file cannot be loaded or the report cannot be
/// written. Usage errors from the checker are reported and mapped to
/// [`EXIT_USAGE`].
pub fn run_check(args: &CheckArgs, out: &mut dyn Write) -> Result<u8> {
    let options = args.flags.options()?;
    let input = load_schema(&args.input)?;
    let target = load_schema(&args.target)?;
    report(&args.input, &args.target, &input, &target, &options, args.flags.format, out)
}

/// Execute `jsc self-check`, writing the report to `out`.
///
/// # Errors
///
/// As for [`run_check`].
pub fn run_self_check(args: &SelfCheckArgs, out: &mut dyn Write) -> Result<u8> {
    let options = args.flags.options()?;
    let schema = load_schema(&args.schema)?;
    report(&args.schema, &args.schema, &schema, &schema, &options, args.flags.format, out)
}

fn report(
    input_path: &Path,
    target_path: &Path,
    input: &Value,
    target: &Value,
    options: &CompatOptions,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<u8> {
    let outcome: Result<Verdict, UsageError> = check(input, target, options);
    let code = match &outcome {
        Ok(Verdict::Compatible) => EXIT_COMPATIBLE,
        Ok(Verdict::Incompatible(_)) => EXIT_INCOMPATIBLE,
        Err(_) => EXIT_USAGE,
    };

    match format {
        OutputFormat::Json => {
            let report = Report {
                input: input_path,
                target: target_path,
                compatible: code == EXIT_COMPATIBLE,
                errors: outcome.as_ref().ok().and_then(Verdict::errors).map(|e| e.errors()),
                usage_error: outcome.as_ref().err().map(ToString::to_string),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => match &outcome {
            Ok(Verdict::Compatible) => {
                writeln!(out, "OK: {} is a subset of {}", input_path.display(), target_path.display())?;
            }
            Ok(Verdict::Incompatible(errors)) => {
                writeln!(
                    out,
                    "INCOMPATIBLE: {} is not a subset of {}",
                    input_path.display(),
                    target_path.display()
                )?;
                writeln!(out, "{errors}")?;
            }
            Err(e) => writeln!(out, "ERROR: {e}")?,
        },
    }
    Ok(code)
}
