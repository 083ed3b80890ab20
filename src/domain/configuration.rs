// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cosmos DB client configuration.
//!
//! `CosmosConfig` is the caller-supplied value object describing how to reach
//! and authenticate against the service. It is checked by
//! [`ConfigValidator`](crate::domain::ConfigValidator) before any client is
//! built from it.

use crate::domain::connection_policy::{ConnectionPolicy, ConsistencyLevel};
use crate::domain::errors::{ConfigError, Result};
use crate::domain::{PropertyKey, PropertyResolver};
use std::fmt;

/// Property keys read by [`CosmosConfig::from_properties`].
pub mod keys {
    /// Full connection string, `AccountEndpoint=...;AccountKey=...;`.
    pub const CONNECTION_STRING: &str = "azure.cosmosdb.connection.string";
    /// Service endpoint URI.
    pub const URI: &str = "azure.cosmosdb.uri";
    /// Primary account key.
    pub const KEY: &str = "azure.cosmosdb.key";
    /// Key held by the alternate key credential.
    pub const CREDENTIAL_KEY: &str = "azure.cosmosdb.credential.key";
    /// Database name.
    pub const DATABASE: &str = "azure.cosmosdb.database";
    /// Consistency level name.
    pub const CONSISTENCY_LEVEL: &str = "azure.cosmosdb.consistency.level";
    /// Whether query metrics are collected.
    pub const POPULATE_QUERY_METRICS: &str = "azure.cosmosdb.populate.query.metrics";
}

/// An alternate key credential.
///
/// When present and non-blank, its key takes priority over the primary key.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyCredential {
    key: String,
}

impl KeyCredential {
    /// Creates a credential holding `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replaces the key, e.g. after a rotation.
    pub fn update(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }
}

impl fmt::Debug for KeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCredential")
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Configuration for constructing a Cosmos DB client.
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::{CosmosConfig, ConnectionPolicy};
///
/// let config = CosmosConfig::builder()
///     .uri("https://example.documents.azure.com:443/")
///     .key("primary-key")
///     .database("orders")
///     .connection_policy(ConnectionPolicy::default())
///     .build();
///
/// assert_eq!(config.database(), "orders");
/// assert_eq!(config.effective_key(), "primary-key");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CosmosConfig {
    uri: String,
    key: String,
    key_credential: Option<KeyCredential>,
    database: String,
    connection_policy: Option<ConnectionPolicy>,
    consistency_level: ConsistencyLevel,
    populate_query_metrics: bool,
}

impl CosmosConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CosmosConfigBuilder {
        CosmosConfigBuilder::new()
    }

    /// Starts a builder from a connection string.
    ///
    /// The string is a `;`-separated list of `name=value` pairs. Only
    /// `AccountEndpoint` and `AccountKey` are read; names are matched without
    /// regard to case. The database and connection policy still have to be
    /// supplied on the returned builder.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if a segment has no `=` or either required
    /// setting is missing.
    pub fn from_connection_string(connection_string: &str) -> Result<CosmosConfigBuilder> {
        let mut endpoint = None;
        let mut account_key = None;

        for segment in connection_string.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            // Keys are base64 and may end in '=', so split on the first one only.
            let (name, value) = segment.split_once('=').ok_or_else(|| ConfigError::ParseError {
                message: "Connection string segment is not a name=value pair".to_string(),
                source: None,
            })?;
            match name.trim().to_ascii_lowercase().as_str() {
                "accountendpoint" => endpoint = Some(value.trim().to_string()),
                "accountkey" => account_key = Some(value.trim().to_string()),
                other => tracing::debug!("Ignoring connection string setting '{}'", other),
            }
        }

        let endpoint = endpoint.ok_or_else(|| ConfigError::ParseError {
            message: "Connection string is missing AccountEndpoint".to_string(),
            source: None,
        })?;
        let account_key = account_key.ok_or_else(|| ConfigError::ParseError {
            message: "Connection string is missing AccountKey".to_string(),
            source: None,
        })?;

        Ok(CosmosConfigBuilder::new().uri(endpoint).key(account_key))
    }

    /// Loads a configuration from properties.
    ///
    /// See [`keys`] for the property names. A connection string, when present,
    /// supplies the endpoint and key; explicit `uri`/`key` properties override
    /// it. Missing text fields are left empty so that validation reports them.
    /// The connection policy is the default policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string, consistency level or
    /// metrics flag cannot be parsed, or if a source fails.
    pub fn from_properties<R: PropertyResolver + ?Sized>(properties: &R) -> Result<Self> {
        let lookup = |name: &str| properties.get_optional(&PropertyKey::from(name));

        let mut builder = match lookup(keys::CONNECTION_STRING)? {
            Some(value) if !value.is_blank() => Self::from_connection_string(value.as_str())?,
            _ => CosmosConfigBuilder::new(),
        };

        if let Some(uri) = lookup(keys::URI)? {
            builder = builder.uri(uri.as_str());
        }
        if let Some(key) = lookup(keys::KEY)? {
            builder = builder.key(key.as_str());
        }
        if let Some(key) = lookup(keys::CREDENTIAL_KEY)? {
            builder = builder.key_credential(KeyCredential::new(key.as_str()));
        }
        if let Some(database) = lookup(keys::DATABASE)? {
            builder = builder.database(database.as_str());
        }
        if let Some(level) = lookup(keys::CONSISTENCY_LEVEL)? {
            builder = builder.consistency_level(level.as_str().parse()?);
        }
        if let Some(flag) = lookup(keys::POPULATE_QUERY_METRICS)? {
            builder = builder.populate_query_metrics(flag.as_bool(keys::POPULATE_QUERY_METRICS)?);
        }

        Ok(builder.connection_policy(ConnectionPolicy::default()).build())
    }

    /// Service endpoint URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Primary account key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Alternate key credential, if any.
    pub fn key_credential(&self) -> Option<&KeyCredential> {
        self.key_credential.as_ref()
    }

    /// Database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Connection policy, if set.
    pub fn connection_policy(&self) -> Option<&ConnectionPolicy> {
        self.connection_policy.as_ref()
    }

    /// Requested consistency level.
    pub fn consistency_level(&self) -> ConsistencyLevel {
        self.consistency_level
    }

    /// Whether query metrics are collected.
    pub fn populate_query_metrics(&self) -> bool {
        self.populate_query_metrics
    }

    /// The key used to authenticate.
    ///
    /// The alternate credential's key wins when the credential is present and
    /// its key is not blank; otherwise the primary key is used.
    pub fn effective_key(&self) -> &str {
        match &self.key_credential {
            Some(credential) if !is_blank(credential.key()) => credential.key(),
            _ => &self.key,
        }
    }
}

impl fmt::Debug for CosmosConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosConfig")
            .field("uri", &self.uri)
            .field("key", &"<redacted>")
            .field("key_credential", &self.key_credential)
            .field("database", &self.database)
            .field("connection_policy", &self.connection_policy)
            .field("consistency_level", &self.consistency_level)
            .field("populate_query_metrics", &self.populate_query_metrics)
            .finish()
    }
}

/// Builder for [`CosmosConfig`].
///
/// Every field starts empty or absent; `build` does not validate.
#[derive(Clone, Debug, Default)]
pub struct CosmosConfigBuilder {
    config: CosmosConfig,
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            key: String::new(),
            key_credential: None,
            database: String::new(),
            connection_policy: None,
            consistency_level: ConsistencyLevel::Session,
            populate_query_metrics: false,
        }
    }
}

impl CosmosConfigBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint URI.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.config.uri = uri.into();
        self
    }

    /// Sets the primary key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.config.key = key.into();
        self
    }

    /// Sets the alternate key credential.
    pub fn key_credential(mut self, credential: KeyCredential) -> Self {
        self.config.key_credential = Some(credential);
        self
    }

    /// Sets the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = database.into();
        self
    }

    /// Sets the connection policy.
    pub fn connection_policy(mut self, policy: ConnectionPolicy) -> Self {
        self.config.connection_policy = Some(policy);
        self
    }

    /// Sets the consistency level.
    pub fn consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.config.consistency_level = level;
        self
    }

    /// Enables or disables query metrics.
    pub fn populate_query_metrics(mut self, enabled: bool) -> Self {
        self.config.populate_query_metrics = enabled;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CosmosConfig {
        self.config
    }
}

/// Returns `true` for empty or whitespace-only text.
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
