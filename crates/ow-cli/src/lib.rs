//! # ow-cli — OverWatch Rules Validator CLI
//!
//! Provides the `owatch` command-line interface: a CI/build-pipeline check
//! that rejects malformed or inconsistent monitoring rules files before they
//! are applied downstream.
//!
//! ```bash
//! owatch                         # validate ./rules.yaml
//! owatch config/rules.yaml       # validate an explicit path
//! owatch rules.yaml --autofind   # search the working tree for rules.yaml
//! ```
//!
//! Exit code 0 means the structural check passed and printed
//! `Valid Rules File`; exit code 1 means it failed and printed
//! `Invalid Rules File`. Duplicate alarm or filter names abort the run
//! through the error channel before the structural check is reached.

pub mod validate;

/// Fixed location of the rule schema, relative to the working directory.
/// Not configurable.
pub const SCHEMA_PATH: &str = "schemas/rule.schema.yaml";

/// Default rules file path when none is given on the command line.
pub const DEFAULT_RULES_PATH: &str = "rules.yaml";
