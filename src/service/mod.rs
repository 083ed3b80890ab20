// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer.
//!
//! [`PropertyService`] resolves properties and telemetry settings,
//! [`TelemetryClient`] dispatches usage events, and [`ClientFactory`] ties
//! validation, user-agent decoration and telemetry together.

pub mod factory;
pub mod property_service;
pub mod telemetry_client;

// Re-export commonly used types
pub use factory::{ClientFactory, ClientHandle, FactoryContext, FactoryContextBuilder};
pub use property_service::{PropertyService, PropertyServiceBuilder};
pub use telemetry_client::{DispatchMode, TelemetryClient, TelemetryEvent};
