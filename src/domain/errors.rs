// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the client factory crate.
//!
//! This module defines the errors raised while loading properties, validating
//! a Cosmos DB configuration, constructing clients, and sending telemetry.
//! All errors use `thiserror` for proper error handling and conversion.

use crate::domain::validator::ValidationRule;
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for configuration and property operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::errors::ConfigError;
/// use cosmos_factory::domain::ValidationRule;
///
/// let error = ConfigError::InvalidConfiguration {
///     rule: ValidationRule::DatabaseName,
/// };
/// assert!(error.to_string().contains("database"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required configuration field is blank or absent.
    ///
    /// Carries the first rule that failed.
    #[error("Invalid configuration: {}", .rule.message())]
    InvalidConfiguration {
        /// The first violated validation rule
        rule: ValidationRule,
    },

    /// The requested property was not found in any source.
    #[error("Property not found: {key}")]
    PropertyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a property value to the requested type.
    #[error("Failed to convert property value for key '{key}' to type {target_type}: {source}")]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred in a property source.
    #[error("Property source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a property file, connection string or value.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading properties.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an `InvalidConfiguration` error for the given rule.
    pub fn invalid(rule: ValidationRule) -> Self {
        ConfigError::InvalidConfiguration { rule }
    }

    /// Returns the violated rule if this is an `InvalidConfiguration` error.
    pub fn rule(&self) -> Option<ValidationRule> {
        match self {
            ConfigError::InvalidConfiguration { rule } => Some(*rule),
            _ => None,
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }
}

/// Errors returned by the client factory constructors.
///
/// Validation failures arrive as [`FactoryError::Config`]. Anything the client
/// library raises while building the handle is carried as
/// [`FactoryError::Client`] holding the library's own error value, so its
/// message and source chain are exactly what the library produced.
#[derive(Debug, Error)]
pub enum FactoryError<E>
where
    E: std::error::Error + 'static,
{
    /// The supplied configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The client library failed to construct the handle.
    #[error(transparent)]
    Client(E),
}

impl<E> FactoryError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns the violated rule when construction failed validation.
    pub fn rule(&self) -> Option<ValidationRule> {
        match self {
            FactoryError::Config(err) => err.rule(),
            FactoryError::Client(_) => None,
        }
    }

    /// Returns the client library error, if that is what failed.
    pub fn into_client_error(self) -> Option<E> {
        match self {
            FactoryError::Client(err) => Some(err),
            FactoryError::Config(_) => None,
        }
    }
}

/// Errors raised by a telemetry sink.
///
/// These never reach the caller of a factory constructor; the telemetry
/// client logs and discards them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelemetryError {
    /// The sink failed to deliver an event.
    #[error("Telemetry sink error: {message}")]
    Sink {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TelemetryError {
    /// Creates a sink error with a message and no source.
    pub fn sink(message: impl Into<String>) -> Self {
        TelemetryError::Sink {
            message: message.into(),
            source: None,
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
