// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property key newtype.
//!
//! `PropertyKey` wraps a dotted property name such as `telemetry.allow` or
//! `azure.cosmosdb.uri` so keys cannot be confused with the values they look up.

use std::fmt;

/// A type-safe wrapper for property keys.
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::PropertyKey;
///
/// let key = PropertyKey::from("telemetry.allow");
/// assert_eq!(key.as_str(), "telemetry.allow");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyKey(String);

impl PropertyKey {
    /// Creates a new `PropertyKey` from a `String`.
    pub fn new(key: String) -> Self {
        PropertyKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `PropertyKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey(s)
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey(s.to_string())
    }
}

impl AsRef<str> for PropertyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
