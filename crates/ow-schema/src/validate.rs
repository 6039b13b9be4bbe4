//! # Schema Validation
//!
//! Runtime validation of rule entries against a JSON Schema definition
//! (Draft 2020-12) authored as a YAML document.
//!
//! ## Validation Scope
//!
//! [`RuleSchema::validate_first`] checks only the FIRST record of a rules
//! document against the schema. This reproduces the behavior of the tool
//! this validator replaces; widening the check to every record is a known
//! open question, so the limitation is kept rather than silently fixed.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use ow_core::RulesDocument;

/// Error during schema loading or validation.
///
/// `ValidationFailed` and `EmptyDocument` are the recoverable outcomes —
/// callers convert them into a pass/fail verdict. Every other variant is an
/// operational error and propagates.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The rule entry did not conform to the schema.
    #[error("rule entry failed validation against '{}':\n{violations}", schema_path.display())]
    ValidationFailed {
        /// Path of the schema document that was validated against.
        schema_path: PathBuf,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The rules document has no first record to validate.
    #[error("rules document contains no rule entries")]
    EmptyDocument,

    /// The schema file could not be read or parsed.
    #[error("schema load error for '{}': {reason}", path.display())]
    SchemaLoad {
        /// Path of the schema document.
        path: PathBuf,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for '{}': {reason}", path.display())]
    ValidatorBuild {
        /// Path of the schema document.
        path: PathBuf,
        /// Reason the validator could not be compiled.
        reason: String,
    },

    /// A rule record could not be converted to JSON for validation.
    #[error("cannot convert rule to JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the rule entry.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// The fixed schema describing the shape of a single rule entry.
///
/// Loads the YAML schema document at construction, converts it to JSON, and
/// compiles a fresh `jsonschema` validator per validation call. The schema is
/// self-contained — no cross-schema `$ref` resolution is required.
#[derive(Debug)]
pub struct RuleSchema {
    path: PathBuf,
    schema: Value,
}

impl RuleSchema {
    /// Load the schema document from the given path.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaLoad`] if the file cannot be read, is not
    /// well-formed YAML, or does not convert to JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref().to_path_buf();

        let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::SchemaLoad {
            path: path.clone(),
            reason: format!("cannot read file: {e}"),
        })?;

        let yaml_value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| SchemaError::SchemaLoad {
                path: path.clone(),
                reason: format!("invalid YAML: {e}"),
            })?;

        let schema = yaml_to_json_value(&yaml_value).map_err(|reason| SchemaError::SchemaLoad {
            path: path.clone(),
            reason,
        })?;

        Ok(Self { path, schema })
    }

    /// Construct a schema directly from a JSON value. Used by tests and
    /// embedders that hold the schema in memory.
    pub fn from_value(schema: Value) -> Self {
        Self {
            path: PathBuf::from("<inline>"),
            schema,
        }
    }

    /// Path the schema was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The schema document as a JSON value.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Compile the schema into a `jsonschema` validator.
    fn build_validator(&self) -> Result<Validator, SchemaError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.build(&self.schema)
            .map_err(|e| SchemaError::ValidatorBuild {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Validate a single rule entry (as a JSON value) against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidationFailed`] with the full violation list
    /// if the entry does not conform.
    pub fn validate_rule(&self, instance: &Value) -> Result<(), SchemaError> {
        let validator = self.build_validator()?;

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema_path: self.path.clone(),
                violations: ValidationViolations { violations },
            })
        }
    }

    /// Validate the first record of a rules document against the schema.
    ///
    /// Later records are not checked; see the module docs for why the scope
    /// is limited to the first entry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyDocument`] if the document has no records,
    /// [`SchemaError::ValidationFailed`] if the first record does not
    /// conform.
    pub fn validate_first(&self, doc: &RulesDocument) -> Result<(), SchemaError> {
        let first = doc.first().ok_or(SchemaError::EmptyDocument)?;
        let instance = first.to_json_value()?;
        self.validate_rule(&instance)
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// YAML has a richer type system than JSON (tags, anchors, non-string keys),
/// but schema documents use only the JSON-compatible subset. Non-string map
/// keys are coerced to strings; YAML tags are stripped.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
