// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry sink trait definition.

use crate::domain::TelemetryError;
use std::collections::HashMap;

/// Receives usage telemetry events.
///
/// A sink is called at most once per constructed client. Its result is only
/// logged; returning an error never affects construction.
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::ports::TelemetrySink;
/// use cosmos_factory::domain::TelemetryError;
/// use std::collections::HashMap;
///
/// struct Discard;
///
/// impl TelemetrySink for Discard {
///     fn send(&self, _event: &str, _properties: &HashMap<String, String>) -> Result<(), TelemetryError> {
///         Ok(())
///     }
/// }
/// ```
pub trait TelemetrySink: Send + Sync {
    /// Delivers one event with its properties.
    fn send(
        &self,
        event_name: &str,
        properties: &HashMap<String, String>,
    ) -> Result<(), TelemetryError>;
}
