// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property file parser trait definition.
//!
//! File-backed sources read raw text and hand it to a `PropertyParser`, which
//! flattens it into dotted keys (`telemetry.allow`, `azure.cosmosdb.uri`).

use crate::domain::Result;
use std::collections::HashMap;

/// Parses the content of a property file into a flat key-value map.
///
/// Nested structures are flattened with dot notation, so
///
/// ```yaml
/// azure:
///   cosmosdb:
///     database: orders
/// ```
///
/// becomes `azure.cosmosdb.database -> "orders"`.
pub trait PropertyParser {
    /// Parses `content` into key-value pairs.
    fn parse(&self, content: &str) -> Result<HashMap<String, String>>;

    /// File extensions this parser understands, without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}
