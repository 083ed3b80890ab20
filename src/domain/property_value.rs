// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property value type with typed conversions.
//!
//! Every property source hands back strings. `PropertyValue` keeps the raw text
//! and converts on demand so that a malformed flag is reported against the key
//! that produced it.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value as read from a source.
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::PropertyValue;
///
/// let value = PropertyValue::from("on");
/// assert!(value.as_bool("telemetry.allow").unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue(String);

impl PropertyValue {
    /// Creates a new `PropertyValue` from a `String`.
    pub fn new(value: String) -> Self {
        PropertyValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an owned copy of the value.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Returns `true` if the value is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following values (case-insensitive, surrounding
    /// whitespace ignored):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => self
                .0
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue(s.to_string())
    }
}

impl AsRef<str> for PropertyValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
