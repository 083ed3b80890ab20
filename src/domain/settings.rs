// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide telemetry settings.
//!
//! The telemetry flag and the library version are read once, typically at
//! startup, and then handed to every factory through its context. Nothing in
//! the crate mutates them afterwards.

use crate::domain::{PropertyKey, PropertyResolver, Result};

/// Property key of the telemetry opt-in flag.
pub const TELEMETRY_ALLOW_KEY: &str = "telemetry.allow";

/// Property key of the library version reported in the user agent.
pub const PROJECT_VERSION_KEY: &str = "project.version";

/// The version compiled into this crate.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Telemetry flag and version string.
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::TelemetrySettings;
///
/// let settings = TelemetrySettings::new(true, "1.2.3");
/// assert!(settings.is_telemetry_allowed());
/// assert_eq!(settings.version(), "1.2.3");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetrySettings {
    telemetry_allowed: bool,
    version: String,
}

impl TelemetrySettings {
    /// Creates settings from explicit values.
    pub fn new(telemetry_allowed: bool, version: impl Into<String>) -> Self {
        Self {
            telemetry_allowed,
            version: version.into(),
        }
    }

    /// Settings with telemetry off and the compiled-in version.
    pub fn disabled() -> Self {
        Self::new(false, CRATE_VERSION)
    }

    /// Resolves settings from properties.
    ///
    /// `telemetry.allow` defaults to `false` when absent. `project.version`
    /// defaults to the compiled-in crate version when absent or blank.
    ///
    /// # Errors
    ///
    /// Returns `TypeConversionError` if `telemetry.allow` is not a boolean.
    pub fn from_properties<R: PropertyResolver + ?Sized>(properties: &R) -> Result<Self> {
        let telemetry_allowed = match properties.get_optional(&PropertyKey::from(TELEMETRY_ALLOW_KEY))? {
            Some(value) => value.as_bool(TELEMETRY_ALLOW_KEY)?,
            None => false,
        };

        let version = match properties.get_optional(&PropertyKey::from(PROJECT_VERSION_KEY))? {
            Some(value) if !value.is_blank() => value.as_str().trim().to_string(),
            _ => CRATE_VERSION.to_string(),
        };

        tracing::debug!(
            "Resolved telemetry settings: allowed={}, version={}",
            telemetry_allowed,
            version
        );

        Ok(Self::new(telemetry_allowed, version))
    }

    /// Whether usage telemetry may be collected.
    pub fn is_telemetry_allowed(&self) -> bool {
        self.telemetry_allowed
    }

    /// The library version reported in the user agent.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self::disabled()
    }
}
