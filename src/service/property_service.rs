// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property service aggregating prioritized sources.
//!
//! The service queries its sources from highest to lowest priority and caches
//! resolved values. It is the usual way to obtain the process-wide
//! [`TelemetrySettings`] and to load a [`CosmosConfig`] from the environment
//! or a configuration file.

use crate::domain::{
    ConfigError, CosmosConfig, PropertyKey, PropertyResolver, PropertyValue, Result,
    TelemetrySettings,
};
use crate::ports::PropertySource;
use std::collections::HashMap;
use std::sync::RwLock;

/// Resolves properties from multiple sources in priority order.
///
/// Sources with higher priority values are queried first, and the first value
/// found is returned. A failing source is skipped, not fatal.
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::prelude::*;
/// use cosmos_factory::service::PropertyService;
///
/// # fn main() -> Result<()> {
/// let service = PropertyService::builder()
///     .with_env_vars()
///     .build()?;
///
/// let settings = service.resolve_settings()?;
/// # let _ = settings;
/// # Ok(())
/// # }
/// ```
pub struct PropertyService {
    /// Sources, kept in priority order (highest first)
    sources: Vec<Box<dyn PropertySource>>,
    cache: RwLock<HashMap<String, PropertyValue>>,
}

impl PropertyService {
    /// Creates a service with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new builder.
    pub fn builder() -> PropertyServiceBuilder {
        PropertyServiceBuilder::new()
    }

    /// Creates a service with environment variables and, if present, the
    /// `config.yaml` and `telemetry.properties` files from the OS-appropriate
    /// configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn with_defaults(app_name: &str, qualifier: &str) -> Result<Self> {
        let mut builder = Self::builder();

        #[cfg(feature = "env")]
        {
            builder = builder.with_env_vars();
        }

        #[cfg(feature = "yaml")]
        {
            use crate::adapters::YamlFileAdapter;
            if let Ok(adapter) = YamlFileAdapter::from_default_location(app_name, qualifier) {
                builder = builder.with_source(Box::new(adapter));
            }
        }

        #[cfg(feature = "properties")]
        {
            use crate::adapters::PropertiesFileAdapter;
            if let Some(dirs) = directories::ProjectDirs::from(qualifier, "", app_name) {
                let path = dirs.config_dir().join("telemetry.properties");
                if let Ok(adapter) = PropertiesFileAdapter::from_file(path) {
                    builder = builder.with_source(Box::new(adapter));
                }
            }
        }

        #[cfg(not(any(feature = "yaml", feature = "properties")))]
        let _ = (app_name, qualifier);

        builder.build()
    }

    /// Adds a source. Sources are re-sorted by priority and the cache cleared.
    pub fn add_source(&mut self, source: Box<dyn PropertySource>) {
        self.sources.push(source);
        self.sources
            .sort_by_key(|s| std::cmp::Reverse(s.priority()));
        self.invalidate_cache();
    }

    /// Names of the registered sources, highest priority first.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Reads `telemetry.allow` and `project.version` once.
    pub fn resolve_settings(&self) -> Result<TelemetrySettings> {
        TelemetrySettings::from_properties(self)
    }

    /// Loads a [`CosmosConfig`] from the `azure.cosmosdb.*` properties.
    ///
    /// The result is not validated; the factory does that.
    pub fn load_cosmos_config(&self) -> Result<CosmosConfig> {
        CosmosConfig::from_properties(self)
    }

    fn invalidate_cache(&self) {
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        cache.clear();
    }

    fn query_sources(&self, key: &PropertyKey) -> Option<PropertyValue> {
        for source in &self.sources {
            match source.get(key) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(
                        "Error querying source '{}' for key '{}': {}",
                        source.name(),
                        key,
                        e
                    );
                }
            }
        }
        None
    }
}

impl Default for PropertyService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PropertyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyService")
            .field("sources", &self.source_names())
            .finish()
    }
}

impl PropertyResolver for PropertyService {
    fn get(&self, key: &PropertyKey) -> Result<PropertyValue> {
        if let Ok(cache) = self.cache.read() {
            if let Some(value) = cache.get(key.as_str()) {
                return Ok(value.clone());
            }
        }

        let value = self
            .query_sources(key)
            .ok_or_else(|| ConfigError::PropertyNotFound {
                key: key.as_str().to_string(),
            })?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.as_str().to_string(), value.clone());
        }

        Ok(value)
    }

    fn reload(&mut self) -> Result<()> {
        for source in &mut self.sources {
            if let Err(e) = source.reload() {
                tracing::warn!("Failed to reload source '{}': {}", source.name(), e);
            }
        }
        self.invalidate_cache();
        Ok(())
    }
}

/// Builder for [`PropertyService`].
///
/// # Examples
///
/// ```rust,no_run
/// use cosmos_factory::service::PropertyServiceBuilder;
///
/// # fn main() -> cosmos_factory::domain::Result<()> {
/// let service = PropertyServiceBuilder::new()
///     .with_env_prefix("MYAPP_")
///     .with_properties_file("/etc/myapp/telemetry.properties")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PropertyServiceBuilder {
    sources: Vec<Box<dyn PropertySource>>,
}

impl PropertyServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property source.
    pub fn with_source(mut self, source: Box<dyn PropertySource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds environment variables, keys mapped `AZURE_COSMOSDB_URI` to
    /// `azure.cosmosdb.uri`.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(
            EnvVarAdapter::new()
                .lowercase_keys(true)
                .replace_underscores(true),
        ))
    }

    /// Adds environment variables starting with `prefix`, with the prefix
    /// stripped from the key.
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(
            EnvVarAdapter::with_prefix(prefix)
                .lowercase_keys(true)
                .replace_underscores(true),
        ))
    }

    /// Adds a YAML file.
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::YamlFileAdapter;
        let adapter = YamlFileAdapter::from_file(path)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Adds a `.properties` file.
    #[cfg(feature = "properties")]
    pub fn with_properties_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::PropertiesFileAdapter;
        let adapter = PropertiesFileAdapter::from_file(path)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Builds the service.
    pub fn build(self) -> Result<PropertyService> {
        let mut service = PropertyService::new();
        for source in self.sources {
            service.add_source(source);
        }
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration::keys;
    use crate::domain::ConsistencyLevel;

    struct MockSource {
        name: String,
        priority: u8,
        values: HashMap<String, String>,
        fail: bool,
    }

    impl MockSource {
        fn new(name: &str, priority: u8) -> Self {
            Self {
                name: name.to_string(),
                priority,
                values: HashMap::new(),
                fail: false,
            }
        }

        fn with_value(mut self, key: &str, value: &str) -> Self {
            self.values.insert(key.to_string(), value.to_string());
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    impl PropertySource for MockSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn get(&self, key: &PropertyKey) -> Result<Option<PropertyValue>> {
            if self.fail {
                return Err(ConfigError::SourceError {
                    source_name: self.name.clone(),
                    message: "unavailable".to_string(),
                    source: None,
                });
            }
            Ok(self
                .values
                .get(key.as_str())
                .map(|v| PropertyValue::from(v.as_str())))
        }

        fn all_keys(&self) -> Result<Vec<PropertyKey>> {
            Ok(self
                .values
                .keys()
                .map(|k| PropertyKey::from(k.as_str()))
                .collect())
        }

        fn reload(&mut self) -> Result<()> {
            if self.fail {
                return Err(ConfigError::SourceError {
                    source_name: self.name.clone(),
                    message: "unavailable".to_string(),
                    source: None,
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_sources_sorted_by_priority() {
        let mut service = PropertyService::new();
        service.add_source(Box::new(MockSource::new("low", 1)));
        service.add_source(Box::new(MockSource::new("high", 3)));
        service.add_source(Box::new(MockSource::new("medium", 2)));

        assert_eq!(service.source_names(), vec!["high", "medium", "low"]);
    }

    #[test]
    fn test_highest_priority_value_wins() {
        let service = PropertyService::builder()
            .with_source(Box::new(MockSource::new("low", 1).with_value("k", "low")))
            .with_source(Box::new(MockSource::new("high", 3).with_value("k", "high")))
            .build()
            .unwrap();

        assert_eq!(service.get(&PropertyKey::from("k")).unwrap().as_str(), "high");
    }

    #[test]
    fn test_failing_source_is_skipped() {
        let service = PropertyService::builder()
            .with_source(Box::new(MockSource::new("broken", 5).failing()))
            .with_source(Box::new(MockSource::new("file", 1).with_value("k", "v")))
            .build()
            .unwrap();

        assert_eq!(service.get(&PropertyKey::from("k")).unwrap().as_str(), "v");
    }

    #[test]
    fn test_missing_key_is_property_not_found() {
        let service = PropertyService::new();
        let err = service.get(&PropertyKey::from("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::PropertyNotFound { key } if key == "nope"));
        assert_eq!(
            service
                .get_or_default(&PropertyKey::from("nope"), "fallback")
                .as_str(),
            "fallback"
        );
        assert!(!service.has(&PropertyKey::from("nope")));
    }

    #[test]
    fn test_reload_tolerates_failing_sources() {
        let mut service = PropertyService::builder()
            .with_source(Box::new(MockSource::new("broken", 2).failing()))
            .build()
            .unwrap();
        assert!(service.reload().is_ok());
    }

    #[test]
    fn test_add_source_invalidates_cache() {
        let mut service = PropertyService::builder()
            .with_source(Box::new(MockSource::new("low", 1).with_value("k", "low")))
            .build()
            .unwrap();
        assert_eq!(service.get(&PropertyKey::from("k")).unwrap().as_str(), "low");

        service.add_source(Box::new(MockSource::new("high", 2).with_value("k", "high")));
        assert_eq!(service.get(&PropertyKey::from("k")).unwrap().as_str(), "high");
    }

    #[test]
    fn test_concurrent_reads_fill_one_cache() {
        let service = PropertyService::builder()
            .with_source(Box::new(MockSource::new("file", 1).with_value("k", "v")))
            .build()
            .unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(service.get(&PropertyKey::from("k")).unwrap().as_str(), "v");
                });
            }
        });

        let cache = service.cache.read().unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").map(PropertyValue::as_str), Some("v"));
    }

    #[test]
    fn test_resolve_settings() {
        let service = PropertyService::builder()
            .with_source(Box::new(
                MockSource::new("file", 1)
                    .with_value("telemetry.allow", "true")
                    .with_value("project.version", "3.2.1"),
            ))
            .build()
            .unwrap();

        let settings = service.resolve_settings().unwrap();
        assert!(settings.is_telemetry_allowed());
        assert_eq!(settings.version(), "3.2.1");
    }

    #[test]
    fn test_resolve_settings_rejects_non_boolean_flag() {
        let service = PropertyService::builder()
            .with_source(Box::new(
                MockSource::new("file", 1).with_value("telemetry.allow", "maybe"),
            ))
            .build()
            .unwrap();

        assert!(matches!(
            service.resolve_settings(),
            Err(ConfigError::TypeConversionError { .. })
        ));
    }

    #[test]
    fn test_load_cosmos_config() {
        let service = PropertyService::builder()
            .with_source(Box::new(
                MockSource::new("file", 1)
                    .with_value(keys::URI, "https://acct.documents.azure.com:443/")
                    .with_value(keys::KEY, "secret")
                    .with_value(keys::DATABASE, "orders")
                    .with_value(keys::CONSISTENCY_LEVEL, "eventual"),
            ))
            .build()
            .unwrap();

        let config = service.load_cosmos_config().unwrap();
        assert_eq!(config.uri(), "https://acct.documents.azure.com:443/");
        assert_eq!(config.database(), "orders");
        assert_eq!(config.consistency_level(), ConsistencyLevel::Eventual);
    }
}
