//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the validator. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Only schema violations are ever recovered into a controlled result (see
//! `ow-schema`); every variant here propagates to the top of the process and
//! terminates it through the error channel, with the underlying cause
//! attached as `#[source]` where one exists.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for rules-document loading and the semantic
/// uniqueness checks.
#[derive(Error, Debug)]
pub enum RulesError {
    /// The rules file could not be opened.
    #[error("cannot open rules file '{}'", path.display())]
    FileAccess {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The rules file is not well-formed YAML.
    #[error("cannot parse rules file '{}'", path.display())]
    Parse {
        /// Path of the file that failed to parse.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A name that must be unique across the document appeared twice.
    ///
    /// The message names the violated constraint, not the offending value.
    #[error("{field} must be unique.")]
    DuplicateName {
        /// The constrained field, `AlarmName` or `filterName`.
        field: &'static str,
    },

    /// A rule is missing a field required for name lookup.
    #[error("rule at index {index} is missing required field '{field}'")]
    MissingField {
        /// Zero-based position of the rule in the document.
        index: usize,
        /// Dotted path of the absent field.
        field: &'static str,
    },
}
