//! # jsc-cli — Command-Line Front End for Subset Checking
//!
//! Provides the `jsc` binary. Schema documents are read from JSON or YAML
//! files, handed to [`jsc_subset::check`], and the verdict is reported as
//! text or JSON.
//!
//! ## Subcommands
//!
//! - `jsc check <INPUT> <TARGET>` — is every value accepted by INPUT also
//!   accepted by TARGET?
//! - `jsc self-check <SCHEMA>` — is SCHEMA a subset of itself? A `false`
//!   here points at a construct the checker cannot reason about.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | compatible |
//! | 1 | incompatible |
//! | 2 | usage error: unreadable file, refused dialect, bad `$ref`, ... |
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here take parsed args.
//! - Handlers write to a caller-supplied sink so tests can capture output.

pub mod check;
pub mod load;

/// Every value accepted by the input is accepted by the target.
pub const EXIT_COMPATIBLE: u8 = 0;
/// The input is not (provably) a subset of the target.
pub const EXIT_INCOMPATIBLE: u8 = 1;
/// The check could not be run.
pub const EXIT_USAGE: u8 = 2;
