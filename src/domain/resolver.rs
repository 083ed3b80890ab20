// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property resolver trait definition.
//!
//! `PropertyResolver` is the read side of the property layer. Settings and
//! configuration loaders depend on this trait rather than on a concrete
//! service so they can be fed from any set of sources.

use crate::domain::{PropertyKey, PropertyValue, Result};

/// Resolves property values across one or more sources.
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::domain::{ConfigError, PropertyKey, PropertyResolver, PropertyValue, Result};
///
/// struct Fixed;
///
/// impl PropertyResolver for Fixed {
///     fn get(&self, key: &PropertyKey) -> Result<PropertyValue> {
///         match key.as_str() {
///             "project.version" => Ok(PropertyValue::from("2.0.0")),
///             other => Err(ConfigError::PropertyNotFound { key: other.to_string() }),
///         }
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let fixed = Fixed;
/// assert!(fixed.has(&PropertyKey::from("project.version")));
/// assert_eq!(fixed.get_or_default(&PropertyKey::from("missing"), "x").as_str(), "x");
/// ```
pub trait PropertyResolver {
    /// Retrieves the value for `key`, or `PropertyNotFound` if no source has it.
    fn get(&self, key: &PropertyKey) -> Result<PropertyValue>;

    /// Retrieves the value for `key` or falls back to `default`.
    fn get_or_default(&self, key: &PropertyKey, default: &str) -> PropertyValue {
        self.get(key)
            .unwrap_or_else(|_| PropertyValue::from(default))
    }

    /// Checks whether any source provides `key`.
    fn has(&self, key: &PropertyKey) -> bool {
        self.get(key).is_ok()
    }

    /// Retrieves an optional value, treating a missing key as `None`.
    ///
    /// Errors other than `PropertyNotFound` are propagated.
    fn get_optional(&self, key: &PropertyKey) -> Result<Option<PropertyValue>> {
        match self.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(crate::domain::ConfigError::PropertyNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Reloads all underlying sources.
    fn reload(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;
    use std::collections::HashMap;

    struct MapResolver(HashMap<String, String>);

    impl PropertyResolver for MapResolver {
        fn get(&self, key: &PropertyKey) -> Result<PropertyValue> {
            self.0
                .get(key.as_str())
                .map(|v| PropertyValue::from(v.as_str()))
                .ok_or_else(|| ConfigError::PropertyNotFound {
                    key: key.as_str().to_string(),
                })
        }

        fn reload(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn resolver() -> MapResolver {
        let mut values = HashMap::new();
        values.insert("telemetry.allow".to_string(), "true".to_string());
        MapResolver(values)
    }

    #[test]
    fn test_resolver_has() {
        let r = resolver();
        assert!(r.has(&PropertyKey::from("telemetry.allow")));
        assert!(!r.has(&PropertyKey::from("project.version")));
    }

    #[test]
    fn test_resolver_get_or_default() {
        let r = resolver();
        let value = r.get_or_default(&PropertyKey::from("project.version"), "0.0.0");
        assert_eq!(value.as_str(), "0.0.0");
    }

    #[test]
    fn test_resolver_get_optional() {
        let r = resolver();
        assert!(r
            .get_optional(&PropertyKey::from("telemetry.allow"))
            .unwrap()
            .is_some());
        assert!(r
            .get_optional(&PropertyKey::from("missing"))
            .unwrap()
            .is_none());
    }
}
