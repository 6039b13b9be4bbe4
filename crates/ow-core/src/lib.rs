#![deny(missing_docs)]

//! # ow-core — Foundational Types for the OverWatch Rules Validator
//!
//! This crate defines the rules-document model and the error hierarchy that
//! the rest of the workspace depends on. It has no internal crate
//! dependencies — only `serde`, `serde_json`, `serde_yaml`, and `thiserror`
//! from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Lossless model.** Every field of a rule entry that the validator does
//!    not interpret is captured verbatim via `#[serde(flatten)]`, so parsing
//!    and re-serializing a rules document never drops user data.
//!
//! 2. **Lookup failures are errors, not parse failures.** `Alarm.AlarmName`
//!    and `Metric.filterName` are optional at the type level; a rule that
//!    lacks them parses fine and fails later, at name lookup, with a
//!    [`RulesError::MissingField`] that names the rule index.
//!
//! 3. **[`RulesError`] hierarchy.** Structured errors with `thiserror` — no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod rules;

pub use error::RulesError;
pub use rules::{Alarm, Metric, Rule, RulesDocument};
