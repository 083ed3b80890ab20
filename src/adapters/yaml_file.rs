// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file property source adapter.

use crate::adapters::file::read_bounded;
use crate::domain::{ConfigError, PropertyKey, PropertyValue, Result};
use crate::ports::{PropertyParser, PropertySource};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const SOURCE_NAME: &str = "yaml-file";

/// Parses YAML into dotted keys.
///
/// Mappings nest with `.`, sequence items use their index, and `null`
/// becomes an empty string.
///
/// # Examples
///
/// ```rust
/// use cosmos_factory::adapters::YamlParser;
/// use cosmos_factory::ports::PropertyParser;
///
/// let parsed = YamlParser::new()
///     .parse("azure:\n  cosmosdb:\n    database: orders\n")
///     .unwrap();
/// assert_eq!(parsed.get("azure.cosmosdb.database"), Some(&"orders".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn flatten(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
        let join = |segment: &str| {
            if prefix.is_empty() {
                segment.to_string()
            } else {
                format!("{}.{}", prefix, segment)
            }
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                for (key, val) in map {
                    let segment = match key {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        _ => continue,
                    };
                    Self::flatten(val, &join(&segment), out);
                }
            }
            serde_yaml::Value::Sequence(seq) => {
                for (i, val) in seq.iter().enumerate() {
                    Self::flatten(val, &join(&i.to_string()), out);
                }
            }
            serde_yaml::Value::String(s) => {
                out.insert(prefix.to_string(), s.clone());
            }
            serde_yaml::Value::Number(n) => {
                out.insert(prefix.to_string(), n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                out.insert(prefix.to_string(), b.to_string());
            }
            serde_yaml::Value::Null => {
                out.insert(prefix.to_string(), String::new());
            }
            serde_yaml::Value::Tagged(tagged) => Self::flatten(&tagged.value, prefix, out),
        }
    }
}

impl PropertyParser for YamlParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        let mut result = HashMap::new();
        Self::flatten(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Property source backed by a YAML file.
///
/// # Priority
///
/// YAML files have a priority of 1 and are overridden by environment variables.
///
/// # Examples
///
/// ```rust,no_run
/// use cosmos_factory::adapters::YamlFileAdapter;
///
/// let adapter = YamlFileAdapter::from_file("/etc/orders/cosmosdb.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    file_path: PathBuf,
    values: HashMap<String, String>,
    parser: YamlParser,
}

impl YamlFileAdapter {
    /// Loads properties from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the file cannot be read or is too large, and
    /// `ParseError` if it is not valid YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let parser = YamlParser::new();
        let (file_path, content) = read_bounded(SOURCE_NAME, path.as_ref())?;
        let values = parser.parse(&content)?;

        Ok(Self {
            file_path,
            values,
            parser,
        })
    }

    /// Loads `config.yaml` from the OS configuration directory for the application.
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "config.yaml")
    }

    /// Loads `filename` from the OS configuration directory for the application.
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(dirs.config_dir().join(filename))
    }

    /// Returns the canonical path of the file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl PropertySource for YamlFileAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn priority(&self) -> u8 {
        1
    }

    fn get(&self, key: &PropertyKey) -> Result<Option<PropertyValue>> {
        Ok(self
            .values
            .get(key.as_str())
            .map(|v| PropertyValue::from(v.as_str())))
    }

    fn all_keys(&self) -> Result<Vec<PropertyKey>> {
        Ok(self
            .values
            .keys()
            .map(|k| PropertyKey::from(k.as_str()))
            .collect())
    }

    fn reload(&mut self) -> Result<()> {
        let (_, content) = read_bounded(SOURCE_NAME, &self.file_path)?;
        self.values = self.parser.parse(&content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_parser_nested() {
        let yaml = r#"
azure:
  cosmosdb:
    uri: https://acct.documents.azure.com:443/
    database: orders
telemetry:
  allow: true
"#;
        let result = YamlParser::new().parse(yaml).unwrap();

        assert_eq!(
            result.get("azure.cosmosdb.uri"),
            Some(&"https://acct.documents.azure.com:443/".to_string())
        );
        assert_eq!(result.get("azure.cosmosdb.database"), Some(&"orders".to_string()));
        assert_eq!(result.get("telemetry.allow"), Some(&"true".to_string()));
    }

    #[test]
    fn test_yaml_parser_sequences_and_null() {
        let yaml = r#"
locations:
  - West US
  - East US
project:
  version: ~
"#;
        let result = YamlParser::new().parse(yaml).unwrap();

        assert_eq!(result.get("locations.0"), Some(&"West US".to_string()));
        assert_eq!(result.get("locations.1"), Some(&"East US".to_string()));
        assert_eq!(result.get("project.version"), Some(&String::new()));
    }

    #[test]
    fn test_yaml_parser_flat_dotted_keys() {
        let result = YamlParser::new().parse("telemetry.allow: false").unwrap();
        assert_eq!(result.get("telemetry.allow"), Some(&"false".to_string()));
    }

    #[test]
    fn test_yaml_parser_invalid() {
        assert!(YamlParser::new().parse("invalid: yaml: content:").is_err());
    }

    #[test]
    fn test_yaml_parser_supported_extensions() {
        assert_eq!(YamlParser::new().supported_extensions(), &["yaml", "yml"]);
    }

    #[test]
    fn test_yaml_adapter_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "project:\n  version: 4.2.0").unwrap();

        let adapter = YamlFileAdapter::from_file(temp_file.path()).unwrap();

        assert_eq!(adapter.name(), "yaml-file");
        assert_eq!(adapter.priority(), 1);
        assert_eq!(
            adapter.get_str("project.version").unwrap().unwrap().as_str(),
            "4.2.0"
        );
        assert_eq!(adapter.all_keys().unwrap().len(), 1);
    }

    #[test]
    fn test_yaml_adapter_reload() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        fs::write(&path, "telemetry:\n  allow: false\n").unwrap();

        let mut adapter = YamlFileAdapter::from_file(&path).unwrap();
        assert_eq!(
            adapter.get_str("telemetry.allow").unwrap().unwrap().as_str(),
            "false"
        );

        fs::write(&path, "telemetry:\n  allow: true\n").unwrap();
        adapter.reload().unwrap();

        assert_eq!(
            adapter.get_str("telemetry.allow").unwrap().unwrap().as_str(),
            "true"
        );
    }

    #[test]
    fn test_yaml_adapter_nonexistent_file() {
        let result = YamlFileAdapter::from_file("/nonexistent/path/to/config.yaml");
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }
}
