// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-agent decoration and the installation fingerprint.
//!
//! The suffix has the form `;<library>/<version>` and, when telemetry is
//! allowed, `;<sha256 of the MAC address>`. The raw hardware identifier never
//! leaves this module; only its hash does.

use crate::domain::{ConnectionPolicy, TelemetrySettings};
use crate::ports::HardwareIdentifier;
use sha2::{Digest, Sha256};
use std::fmt;

/// Library name used in the base tag.
pub const LIBRARY_NAME: &str = env!("CARGO_PKG_NAME");

/// Returns the base tag `<library>/<version>`.
pub fn base_tag(version: &str) -> String {
    format!("{}/{}", LIBRARY_NAME, version)
}

/// Normalizes a MAC address to lowercase, colon-separated form.
///
/// Accepts six two-digit hex groups separated by `:` or `-`. All-zero
/// addresses, such as the loopback interface reports, are rejected.
pub fn normalize_mac(raw: &str) -> Option<String> {
    let groups: Vec<&str> = raw.trim().split([':', '-']).collect();
    if groups.len() != 6 {
        return None;
    }
    if !groups
        .iter()
        .all(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return None;
    }
    if groups.iter().all(|g| *g == "00") {
        return None;
    }
    Some(groups.join(":").to_lowercase())
}

/// Hashes a MAC address into an anonymous installation fingerprint.
///
/// Returns `None` if `raw` is not a usable MAC address.
pub fn hash_mac(raw: &str) -> Option<String> {
    let normalized = normalize_mac(raw)?;
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    Some(hex::encode(hasher.finalize()))
}

/// Derives the fingerprint from the first usable address `identifier` reports.
pub fn installation_fingerprint(identifier: &dyn HardwareIdentifier) -> Option<String> {
    identifier
        .mac_addresses()
        .iter()
        .find_map(|mac| hash_mac(mac))
}

/// A precomputed user-agent suffix.
///
/// # Examples
///
/// ```
/// use cosmos_factory::domain::{ConnectionPolicy, TelemetrySettings, UserAgentSuffix};
///
/// let suffix = UserAgentSuffix::new(&TelemetrySettings::new(false, "1.0.0"), None);
/// let mut policy = ConnectionPolicy::default().with_user_agent_suffix("foo");
/// suffix.decorate(&mut policy);
/// assert_eq!(policy.user_agent_suffix(), "foo;cosmos-factory/1.0.0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAgentSuffix(String);

impl UserAgentSuffix {
    /// Builds the suffix for `settings`.
    ///
    /// The fingerprint is only appended when telemetry is allowed.
    pub fn new(settings: &TelemetrySettings, fingerprint: Option<&str>) -> Self {
        let mut suffix = format!(";{}", base_tag(settings.version()));
        if settings.is_telemetry_allowed() {
            if let Some(fingerprint) = fingerprint {
                suffix.push(';');
                suffix.push_str(fingerprint);
            }
        }
        Self(suffix)
    }

    /// Returns the suffix text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends this suffix to the policy's existing user-agent suffix.
    pub fn decorate(&self, policy: &mut ConnectionPolicy) {
        policy.append_user_agent_suffix(&self.0);
    }
}

impl fmt::Display for UserAgentSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
