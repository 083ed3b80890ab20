// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration validation.
//!
//! Validation is fail-fast: rules are checked in a fixed order and the first
//! violation is reported. The checks are pure, so the same configuration
//! always produces the same outcome and the same rule.

use crate::domain::configuration::{is_blank, CosmosConfig};
use crate::domain::errors::{ConfigError, Result};
use std::fmt;

/// A precondition checked before a client is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    /// The endpoint URI must have text.
    EndpointUri,
    /// Without an alternate credential, the primary key must have text.
    PrimaryKey,
    /// With a credential but a blank primary key, the credential's key must have text.
    CredentialKey,
    /// The database name must have text.
    DatabaseName,
    /// A connection policy must be supplied.
    ConnectionPolicy,
    /// The host passed to raw host/key construction must have text.
    Host,
    /// The key passed to raw host/key construction must have text.
    Key,
}

impl ValidationRule {
    /// Human-readable description of the violated precondition.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationRule::EndpointUri => "cosmosdb endpoint uri must not be blank",
            ValidationRule::PrimaryKey => "cosmosdb key must not be blank",
            ValidationRule::CredentialKey => "cosmosdb credential key must not be blank",
            ValidationRule::DatabaseName => "cosmosdb database name must not be blank",
            ValidationRule::ConnectionPolicy => "cosmosdb connection policy must be set",
            ValidationRule::Host => "host must not be blank",
            ValidationRule::Key => "key must not be blank",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Validates a [`CosmosConfig`].
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::{ConfigValidator, CosmosConfig, ValidationRule};
///
/// let config = CosmosConfig::builder().uri(" ").key("k").database("db").build();
/// let err = ConfigValidator::validate(&config).unwrap_err();
/// assert_eq!(err.rule(), Some(ValidationRule::EndpointUri));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks `config` and returns the first violated rule as
    /// `ConfigError::InvalidConfiguration`.
    pub fn validate(config: &CosmosConfig) -> Result<()> {
        match Self::first_violation(config) {
            Some(rule) => Err(ConfigError::invalid(rule)),
            None => Ok(()),
        }
    }

    /// Returns the first rule `config` violates, if any.
    pub fn first_violation(config: &CosmosConfig) -> Option<ValidationRule> {
        if is_blank(config.uri()) {
            return Some(ValidationRule::EndpointUri);
        }

        match config.key_credential() {
            None if is_blank(config.key()) => return Some(ValidationRule::PrimaryKey),
            Some(credential) if is_blank(config.key()) && is_blank(credential.key()) => {
                return Some(ValidationRule::CredentialKey);
            }
            _ => {}
        }

        if is_blank(config.database()) {
            return Some(ValidationRule::DatabaseName);
        }

        if config.connection_policy().is_none() {
            return Some(ValidationRule::ConnectionPolicy);
        }

        None
    }

    /// Checks the host and key used for raw host/key construction, host first.
    pub fn validate_host_key(host: &str, key: &str) -> Result<()> {
        if is_blank(host) {
            return Err(ConfigError::invalid(ValidationRule::Host));
        }
        if is_blank(key) {
            return Err(ConfigError::invalid(ValidationRule::Key));
        }
        Ok(())
    }
}
