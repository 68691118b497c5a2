//! Dynamically typed argument bags for `tools/call` and `prompts/get`.
//!
//! Every accessor is total: it either yields a value, falls back to a caller
//! supplied default, or reports an [`ArgumentError`]. A key that is absent and
//! a key that is explicitly `null` are treated the same way.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// JSON `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Number (integers are widened)
    Number(f64),
    /// String
    String(String),
    /// Array
    Array(Vec<ArgValue>),
    /// Nested object
    Object(HashMap<String, ArgValue>),
}

impl ArgValue {
    /// Borrow as a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Name of the JSON type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Errors from the required-value accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The key is absent or `null`
    #[error("Missing required argument: {0}")]
    Missing(String),
    /// The key holds a value of another type
    #[error("Argument '{name}' must be a {expected}, got {actual}")]
    WrongType {
        /// Argument name
        name: String,
        /// Expected JSON type
        expected: &'static str,
        /// Actual JSON type
        actual: &'static str,
    },
}

/// Mapping from argument name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(HashMap<String, ArgValue>);

impl Arguments {
    /// Empty argument bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value for `key`, treating `null` as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key).filter(|v| !matches!(v, ArgValue::Null))
    }

    /// Whether a non-null value is present for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String value for `key`, if present and a string.
    #[must_use]
    pub fn optional_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ArgValue::as_str)
    }

    /// String value for `key`, or `default` when absent or not a string.
    #[must_use]
    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.optional_str(key).unwrap_or(default).to_string()
    }

    /// Number value for `key`, or `default` when absent or not a number.
    #[must_use]
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(ArgValue::as_f64).unwrap_or(default)
    }

    /// Boolean value for `key`, or `default` when absent or not a boolean.
    #[must_use]
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(ArgValue::as_bool).unwrap_or(default)
    }

    /// String value for a mandatory key.
    pub fn require_str(&self, key: &str) -> Result<&str, ArgumentError> {
        let value = self
            .get(key)
            .ok_or_else(|| ArgumentError::Missing(key.to_string()))?;
        value.as_str().ok_or_else(|| ArgumentError::WrongType {
            name: key.to_string(),
            expected: "string",
            actual: value.type_name(),
        })
    }

    /// Number value for a mandatory key.
    pub fn require_number(&self, key: &str) -> Result<f64, ArgumentError> {
        let value = self
            .get(key)
            .ok_or_else(|| ArgumentError::Missing(key.to_string()))?;
        value.as_f64().ok_or_else(|| ArgumentError::WrongType {
            name: key.to_string(),
            expected: "number",
            actual: value.type_name(),
        })
    }

    /// Number of entries, including explicit nulls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ArgValue)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
