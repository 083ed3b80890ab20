// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry sink that writes events to the `tracing` subscriber.

use crate::domain::TelemetryError;
use crate::ports::TelemetrySink;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Emits each telemetry event as an `info` record on the
/// `cosmos_factory::telemetry` target.
///
/// Useful when usage events should land in the application's own logs
/// instead of a remote collector.
#[derive(Debug, Clone, Default)]
pub struct TracingTelemetrySink;

impl TracingTelemetrySink {
    /// Creates a new sink.
    pub fn new() -> Self {
        TracingTelemetrySink
    }
}

impl TelemetrySink for TracingTelemetrySink {
    fn send(
        &self,
        event_name: &str,
        properties: &HashMap<String, String>,
    ) -> Result<(), TelemetryError> {
        // Sorted for stable log output.
        let properties: BTreeMap<&str, &str> = properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        tracing::info!(
            target: "cosmos_factory::telemetry",
            event = event_name,
            properties = ?properties,
            "telemetry event"
        );
        Ok(())
    }
}
