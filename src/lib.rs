// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated construction of Cosmos DB client handles.
//!
//! This crate checks a Cosmos DB client configuration, builds the client
//! through an injected client library with a decorated user-agent suffix, and
//! emits one best-effort usage event per construction.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Configuration, validation rules, connection policy,
//!   telemetry settings and the user-agent suffix
//! - **Ports**: Traits for the collaborators (`ClientProvider`, `PolicyHandle`,
//!   `TelemetrySink`, `HardwareIdentifier`, `PropertySource`)
//! - **Adapters**: Environment variables, YAML and `.properties` files, sysfs
//!   network interfaces and a `tracing` telemetry sink
//! - **Service**: `PropertyService`, `TelemetryClient` and `ClientFactory`
//!
//! # Platform Support
//!
//! The installation fingerprint comes from a [`ports::HardwareIdentifier`].
//! The bundled `SysfsNetworkInterfaces` adapter only discovers MAC addresses
//! on Linux. Elsewhere it reports none and the user-agent suffix is sent
//! without a fingerprint, even when telemetry is allowed.
//!
//! # Feature Flags
//!
//! - `env`: Enable environment variable support (default)
//! - `yaml`: Enable YAML file support (default)
//! - `properties`: Enable `.properties` file support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cosmos_factory::prelude::*;
//! use cosmos_factory::adapters::{SysfsNetworkInterfaces, TracingTelemetrySink};
//! use cosmos_factory::service::{ClientFactory, FactoryContext, PropertyService};
//!
//! # struct Provider;
//! # impl ClientProvider for Provider {
//! #     type Client = ConnectionPolicy;
//! #     type Error = std::io::Error;
//! #     fn create_client(&self, _: &str, _: &str, policy: ConnectionPolicy, _: ConsistencyLevel)
//! #         -> std::result::Result<ConnectionPolicy, std::io::Error> { Ok(policy) }
//! # }
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let properties = PropertyService::with_defaults("orders", "com.example")?;
//!
//! let context = FactoryContext::builder()
//!     .with_settings(properties.resolve_settings()?)
//!     .with_telemetry_sink(TracingTelemetrySink::new())
//!     .with_hardware_identifier(SysfsNetworkInterfaces::new())
//!     .build();
//!
//! let config = properties.load_cosmos_config()?;
//! let factory = ClientFactory::from_config(config, &Provider, &context)?;
//! # let _ = factory.client();
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigValidator, ConnectionPolicy, ConsistencyLevel, CosmosConfig,
        FactoryError, KeyCredential, PropertyKey, PropertyResolver, PropertyValue, Result,
        TelemetrySettings, ValidationRule,
    };
    pub use crate::ports::{
        ClientProvider, HardwareIdentifier, PolicyHandle, PropertySource, TelemetrySink,
    };
    pub use crate::service::{ClientFactory, FactoryContext, PropertyService};

    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "properties")]
    pub use crate::adapters::PropertiesFileAdapter;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlFileAdapter;
}
