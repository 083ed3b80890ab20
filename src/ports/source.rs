// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property source trait definition.
//!
//! `PropertySource` is the port every property backend implements: environment
//! variables, YAML files, `.properties` files, or anything a caller plugs in.

use crate::domain::{PropertyKey, PropertyValue, Result};

/// A source of property values.
///
/// # Priority
///
/// Each source has a priority value (0-255). When several sources provide the
/// same key, the highest priority wins. The built-in adapters use:
///
/// - **2**: Environment variables
/// - **1**: YAML and `.properties` files
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::ports::PropertySource;
/// use cosmos_factory::domain::{PropertyKey, PropertyValue, Result};
///
/// struct Defaults;
///
/// impl PropertySource for Defaults {
///     fn name(&self) -> &str {
///         "defaults"
///     }
///
///     fn priority(&self) -> u8 {
///         0
///     }
///
///     fn get(&self, key: &PropertyKey) -> Result<Option<PropertyValue>> {
///         Ok((key.as_str() == "telemetry.allow").then(|| PropertyValue::from("false")))
///     }
///
///     fn all_keys(&self) -> Result<Vec<PropertyKey>> {
///         Ok(vec![PropertyKey::from("telemetry.allow")])
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let source = Defaults;
/// assert!(source.get_str("telemetry.allow").unwrap().is_some());
/// ```
pub trait PropertySource: Send + Sync {
    /// Short identifier used in logs and errors, e.g. `"env"`.
    fn name(&self) -> &str;

    /// Precedence of this source; higher wins.
    fn priority(&self) -> u8;

    /// Returns `Ok(Some(value))` if the key exists, `Ok(None)` if it does not.
    fn get(&self, key: &PropertyKey) -> Result<Option<PropertyValue>>;

    /// Lists every key this source provides.
    fn all_keys(&self) -> Result<Vec<PropertyKey>>;

    /// Re-reads the underlying data. Sources that cannot change return `Ok(())`.
    fn reload(&mut self) -> Result<()>;

    /// Convenience wrapper around [`get`](PropertySource::get) taking a string key.
    fn get_str(&self, key: &str) -> Result<Option<PropertyValue>> {
        self.get(&PropertyKey::from(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptySource;

    impl PropertySource for EmptySource {
        fn name(&self) -> &str {
            "empty"
        }

        fn priority(&self) -> u8 {
            1
        }

        fn get(&self, _key: &PropertyKey) -> Result<Option<PropertyValue>> {
            Ok(None)
        }

        fn all_keys(&self) -> Result<Vec<PropertyKey>> {
            Ok(vec![])
        }

        fn reload(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_get_str_delegates_to_get() {
        let source = EmptySource;
        assert!(source.get_str("anything").unwrap().is_none());
    }

    #[test]
    fn test_property_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn PropertySource>>();
    }
}
