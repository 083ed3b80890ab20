// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits describe the collaborators the factory depends on without
//! owning: property sources, the database client library, the telemetry sink
//! and the network hardware. Adapters implement them.

pub mod client;
pub mod hardware;
pub mod parser;
pub mod source;
pub mod telemetry;

// Re-export commonly used types
pub use client::{ClientProvider, PolicyHandle};
pub use hardware::HardwareIdentifier;
pub use parser::PropertyParser;
pub use source::PropertySource;
pub use telemetry::TelemetrySink;
