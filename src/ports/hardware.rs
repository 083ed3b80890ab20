// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network hardware identifier trait definition.

/// Reports the MAC addresses of the local network interfaces.
///
/// Addresses are returned as text in whatever form the platform uses; they are
/// normalized and hashed by
/// [`installation_fingerprint`](crate::domain::user_agent::installation_fingerprint)
/// before use.
///
/// An empty list means no fingerprint: the user-agent suffix then carries only
/// the library tag. The bundled
/// [`SysfsNetworkInterfaces`](crate::adapters::SysfsNetworkInterfaces) reads
/// `/sys/class/net` and so finds addresses only on Linux; on macOS, Windows or
/// in sandboxes without sysfs it returns nothing. Supply another implementation
/// to fingerprint installations on those platforms.
pub trait HardwareIdentifier: Send + Sync {
    /// Returns interface MAC addresses, in a stable order.
    fn mac_addresses(&self) -> Vec<String>;
}
