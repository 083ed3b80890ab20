// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and validation logic.
//!
//! Nothing in this module performs I/O. It defines the configuration model,
//! the validation rules, the user-agent decoration and the error types used
//! throughout the crate.

pub mod configuration;
pub mod connection_policy;
pub mod errors;
pub mod property_key;
pub mod property_value;
pub mod resolver;
pub mod settings;
pub mod user_agent;
pub mod validator;

// Re-export commonly used types
pub use configuration::{CosmosConfig, CosmosConfigBuilder, KeyCredential};
pub use connection_policy::{ConnectionPolicy, ConsistencyLevel, RetryOptions};
pub use errors::{ConfigError, FactoryError, Result, TelemetryError};
pub use property_key::PropertyKey;
pub use property_value::PropertyValue;
pub use resolver::PropertyResolver;
pub use settings::TelemetrySettings;
pub use user_agent::UserAgentSuffix;
pub use validator::{ConfigValidator, ValidationRule};
