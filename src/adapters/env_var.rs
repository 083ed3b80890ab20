// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable property source adapter.
//!
//! Variables are mapped to dotted keys: with `lowercase_keys(true)` the
//! variable `AZURE_COSMOSDB_URI` answers for `azure.cosmosdb.uri`.

use crate::domain::{PropertyKey, PropertyValue, Result};
use crate::ports::PropertySource;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

/// Maximum length for environment variable keys
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (1MB)
const MAX_ENV_VALUE_LEN: usize = 1_048_576;

/// Property source backed by the process environment.
///
/// # Priority
///
/// Environment variables have a priority of 2 and override property files
/// (priority 1).
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::adapters::EnvVarAdapter;
/// use cosmos_factory::ports::PropertySource;
///
/// let adapter = EnvVarAdapter::with_prefix("MYAPP_").lowercase_keys(true);
/// assert_eq!(adapter.name(), "env");
/// ```
#[derive(Debug)]
pub struct EnvVarAdapter {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Whether to convert keys to lowercase
    lowercase_keys: bool,
    /// Whether to replace underscores with dots
    replace_underscores: bool,
    /// Snapshot of the environment, loaded on first access
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl EnvVarAdapter {
    /// Creates an adapter reading every environment variable.
    pub fn new() -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            replace_underscores: true,
            cache: RwLock::new(None),
        }
    }

    /// Creates an adapter reading only variables that start with `prefix`.
    ///
    /// The prefix is stripped before the key is transformed.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// Converts variable names to lowercase.
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Replaces underscores with dots (enabled by default).
    pub fn replace_underscores(mut self, enabled: bool) -> Self {
        self.replace_underscores = enabled;
        self
    }

    /// Creates an adapter over fixed values instead of the process environment.
    ///
    /// Keys are used as given. Intended for tests.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            replace_underscores: false,
            cache: RwLock::new(Some(values)),
        }
    }

    /// Maps a variable name to a property key, or `None` if it is filtered out.
    fn transform_key(&self, name: String) -> Option<String> {
        let mut key = match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix.as_str())?.to_string(),
            None => name,
        };
        if self.lowercase_keys {
            key = key.to_lowercase();
        }
        if self.replace_underscores {
            key = key.replace('_', ".");
        }
        Some(key)
    }

    fn load(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();

        for (name, value) in env::vars() {
            if name.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={}",
                    name.len(),
                    value.len()
                );
                continue;
            }
            if let Some(key) = self.transform_key(name) {
                values.insert(key, value);
            }
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?}, lowercase={}, replace_underscores={})",
            values.len(),
            self.prefix,
            self.lowercase_keys,
            self.replace_underscores
        );

        values
    }

    /// Runs `f` against the snapshot, loading it first if necessary.
    fn with_cache<T>(&self, f: impl FnOnce(&HashMap<String, String>) -> T) -> T {
        {
            let guard = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(values) = guard.as_ref() {
                return f(values);
            }
        }

        let mut guard = self.cache.write().unwrap_or_else(|e| e.into_inner());
        let values = guard.get_or_insert_with(|| self.load());
        f(values)
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertySource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn get(&self, key: &PropertyKey) -> Result<Option<PropertyValue>> {
        Ok(self.with_cache(|values| {
            values
                .get(key.as_str())
                .map(|v| PropertyValue::from(v.as_str()))
        }))
    }

    fn all_keys(&self) -> Result<Vec<PropertyKey>> {
        Ok(self.with_cache(|values| {
            values
                .keys()
                .map(|k| PropertyKey::from(k.as_str()))
                .collect()
        }))
    }

    fn reload(&mut self) -> Result<()> {
        // Drop the snapshot; the next access re-reads the environment.
        *self.cache.get_mut().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
