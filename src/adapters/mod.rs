// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing port implementations.
//!
//! Property sources (environment variables, YAML and `.properties` files),
//! the sysfs network interface reader and the `tracing` telemetry sink.

#[cfg(feature = "env")]
pub mod env_var;
#[cfg(feature = "properties")]
pub mod properties_file;
pub mod sysfs_hardware;
pub mod tracing_sink;
#[cfg(feature = "yaml")]
pub mod yaml_file;

#[cfg(any(feature = "yaml", feature = "properties"))]
pub(crate) mod file;

// Re-export adapters based on feature flags
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
#[cfg(feature = "properties")]
pub use properties_file::{PropertiesFileAdapter, PropertiesParser};
pub use sysfs_hardware::SysfsNetworkInterfaces;
pub use tracing_sink::TracingTelemetrySink;
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
