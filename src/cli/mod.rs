//! # CLI Module
//!
//! Command-line front end for the type generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate Go declarations for every document of a schema file:
//!
//! ```bash
//! crd-typegen generate --input crds.yaml --output zz_generated.go
//! ```
//!
//! Options:
//! - `--input <FILE>` - Schema documents, YAML or JSON, `---` separated (required)
//! - `--output <FILE>` - Destination file; stdout when omitted
//! - `--version <NAME>` - Version to generate (default: first declared)
//! - `--package <NAME>` - Wrap the output in a complete file with a package
//!   clause and import block
//! - `--config <FILE>` - Generator config (default: `crd-typegen.toml` next
//!   to the input, if present)
//!
//! The output file is only written once every document generated
//! successfully.
//!
//! ### `inspect`
//!
//! List the kind, group and declared versions of each document:
//!
//! ```bash
//! crd-typegen inspect --input crds.yaml
//! ```
//!
//! ## Logging
//!
//! Logs go to stderr. `-v` raises the level to debug, `-vv` to trace;
//! `CRD_TYPEGEN_LOG_LEVEL`, `CRD_TYPEGEN_LOG_FORMAT` and `RUST_LOG` are
//! honored (see [`crate::logging`]).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
