//! # Rules Document Model
//!
//! A rules document is an ordered YAML sequence of rule entries, each pairing
//! an alarm definition with the metric filter that feeds it:
//!
//! ```yaml
//! - Alarm:
//!     AlarmName: high-error-rate
//!     Threshold: 5
//!   Metric:
//!     filterName: api-error-count
//!     filterPattern: '{ $.level = "error" }'
//! ```
//!
//! Only `Alarm.AlarmName` and `Metric.filterName` are interpreted; all other
//! fields are carried verbatim through `#[serde(flatten)]` so that a parsed
//! document re-serializes without loss. Unmodeled values are held as
//! `serde_json::Value`, matching the JSON-compatible subset the downstream
//! tooling consumes.
//!
//! The document is read fresh from disk on every [`RulesDocument::load`] call
//! and is immutable once parsed.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RulesError;

/// An alarm definition within a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    /// Unique alarm identifier. Absence is surfaced at name lookup, not at
    /// parse time.
    #[serde(
        rename = "AlarmName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alarm_name: Option<String>,

    /// Remaining alarm properties (description, threshold, comparison
    /// operator, …), preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A metric-filter definition within a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Unique metric-filter identifier. Absence is surfaced at name lookup,
    /// not at parse time.
    #[serde(
        rename = "filterName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub filter_name: Option<String>,

    /// Remaining filter properties (pattern, log group, transformations, …),
    /// preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One monitoring rule: an alarm paired with the metric filter that feeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// The alarm definition.
    #[serde(rename = "Alarm", default, skip_serializing_if = "Option::is_none")]
    pub alarm: Option<Alarm>,

    /// The metric-filter definition.
    #[serde(rename = "Metric", default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,

    /// Any further top-level rule fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Rule {
    /// Convert this rule to a JSON value, e.g. for schema validation.
    pub fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// An ordered sequence of rules, as parsed from a rules file.
///
/// Insertion order is preserved from the source file but carries no
/// semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulesDocument {
    rules: Vec<Rule>,
}

impl RulesDocument {
    /// Parse a rules document from YAML text.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Load and parse a rules document from a file path.
    ///
    /// Always performs a fresh read; nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// [`RulesError::FileAccess`] if the path cannot be opened and
    /// [`RulesError::Parse`] if the content is not well-formed YAML.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| RulesError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All rules, in document order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules in the document.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the document contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The first rule of the document, if any.
    pub fn first(&self) -> Option<&Rule> {
        self.rules.first()
    }

    /// Collect every `Alarm.AlarmName` in document order, rejecting
    /// duplicates.
    ///
    /// Fails on the first repeated name with [`RulesError::DuplicateName`],
    /// and on the first rule lacking the field with
    /// [`RulesError::MissingField`].
    pub fn unique_alarm_names(&self) -> Result<Vec<&str>, RulesError> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            let name = rule
                .alarm
                .as_ref()
                .and_then(|alarm| alarm.alarm_name.as_deref())
                .ok_or(RulesError::MissingField {
                    index,
                    field: "Alarm.AlarmName",
                })?;
            if !seen.insert(name) {
                return Err(RulesError::DuplicateName { field: "AlarmName" });
            }
            names.push(name);
        }
        Ok(names)
    }

    /// Collect every `Metric.filterName` in document order, rejecting
    /// duplicates.
    ///
    /// Same contract as [`RulesDocument::unique_alarm_names`], applied to the
    /// metric-filter identifier.
    pub fn unique_filter_names(&self) -> Result<Vec<&str>, RulesError> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            let name = rule
                .metric
                .as_ref()
                .and_then(|metric| metric.filter_name.as_deref())
                .ok_or(RulesError::MissingField {
                    index,
                    field: "Metric.filterName",
                })?;
            if !seen.insert(name) {
                return Err(RulesError::DuplicateName { field: "filterName" });
            }
            names.push(name);
        }
        Ok(names)
    }
}
