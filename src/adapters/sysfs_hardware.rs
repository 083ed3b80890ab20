// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network interface discovery through sysfs.

use crate::ports::HardwareIdentifier;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of network interfaces on Linux.
const SYS_CLASS_NET: &str = "/sys/class/net";

/// Reads interface MAC addresses from `<root>/<iface>/address`.
///
/// Interfaces are visited in name order so the first usable address is
/// stable across runs. Missing or unreadable directories yield no addresses;
/// on platforms without sysfs this simply reports nothing.
#[derive(Debug, Clone)]
pub struct SysfsNetworkInterfaces {
    root: PathBuf,
}

impl SysfsNetworkInterfaces {
    /// Reads from `/sys/class/net`.
    pub fn new() -> Self {
        Self::with_root(SYS_CLASS_NET)
    }

    /// Reads from a custom directory laid out like `/sys/class/net`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl Default for SysfsNetworkInterfaces {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareIdentifier for SysfsNetworkInterfaces {
    fn mac_addresses(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Cannot list network interfaces: {}", e);
                return Vec::new();
            }
        };

        let mut interfaces: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        interfaces.sort();

        interfaces
            .iter()
            .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some("lo"))
            .filter_map(|path| fs::read_to_string(path.join("address")).ok())
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty())
            .collect()
    }
}
