//! # ow-schema — Rule Schema Validation
//!
//! Runtime validation of rule entries against the fixed JSON Schema document
//! that describes the shape of a single rule.
//!
//! The schema is authored in YAML (the same format family as the rules file),
//! converted to JSON, and compiled with the `jsonschema` crate. Validation
//! failures are reported as structured [`Violation`] lists carrying the
//! instance path, the schema path, and a human-readable message.
//!
//! Only [`SchemaError::ValidationFailed`] and [`SchemaError::EmptyDocument`]
//! are meant to be recovered by callers; the remaining variants are
//! operational errors that propagate.

pub mod validate;

pub use validate::{
    yaml_to_json_value, RuleSchema, SchemaError, ValidationViolations, Violation,
};
