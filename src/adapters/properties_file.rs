// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.properties` file property source adapter.
//!
//! Reads the line-oriented `key=value` format commonly used for telemetry
//! opt-out files such as:
//!
//! ```text
//! # Set to false to disable usage telemetry
//! telemetry.allow=true
//! project.version: 2.1.0
//! ```

use crate::adapters::file::read_bounded;
use crate::domain::{ConfigError, PropertyKey, PropertyValue, Result};
use crate::ports::{PropertyParser, PropertySource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const SOURCE_NAME: &str = "properties-file";

/// Parser for the `.properties` format.
///
/// - Blank lines and lines whose first non-blank character is `#` or `!` are
///   ignored. A comment line is never continued.
/// - A line ending in an odd number of backslashes continues on the next line,
///   whose leading whitespace is dropped.
/// - The key ends at the first unescaped `=`, `:` or whitespace. Whitespace
///   and one `=` or `:` after the key are skipped.
/// - `\t`, `\n`, `\r`, `\f` and `\uXXXX` are decoded in keys and values; any
///   other escaped character stands for itself.
/// - Later duplicates override earlier ones.
#[derive(Debug, Clone, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        PropertiesParser
    }

    /// Joins continuation lines into logical lines, dropping comments.
    fn logical_lines(content: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut continuing = false;

        for raw in content.lines() {
            let line = raw.trim_start();
            if !continuing && (line.is_empty() || line.starts_with(['#', '!'])) {
                continue;
            }

            let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
            if trailing % 2 == 1 {
                current.push_str(&line[..line.len() - 1]);
                continuing = true;
                continue;
            }

            current.push_str(line);
            lines.push(std::mem::take(&mut current));
            continuing = false;
        }

        if continuing {
            lines.push(current);
        }

        lines
    }

    fn is_blank(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\x0c')
    }

    fn split_entry(line: &str) -> Result<(String, String)> {
        let chars: Vec<char> = line.chars().collect();

        let mut key_end = chars.len();
        let mut escaped = false;
        for (i, &c) in chars.iter().enumerate() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '=' || c == ':' || Self::is_blank(c) {
                key_end = i;
                break;
            }
        }

        let mut value_start = key_end;
        while value_start < chars.len() && Self::is_blank(chars[value_start]) {
            value_start += 1;
        }
        if value_start < chars.len() && matches!(chars[value_start], '=' | ':') {
            value_start += 1;
            while value_start < chars.len() && Self::is_blank(chars[value_start]) {
                value_start += 1;
            }
        }

        Ok((
            Self::unescape(&chars[..key_end])?,
            Self::unescape(&chars[value_start..])?,
        ))
    }

    fn unescape(chars: &[char]) -> Result<String> {
        let mut out = String::with_capacity(chars.len());
        let mut iter = chars.iter().copied();

        while let Some(c) = iter.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match iter.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('f') => out.push('\x0c'),
                Some('u') => {
                    let digits: String = iter.by_ref().take(4).collect();
                    let decoded = if digits.len() == 4
                        && digits.chars().all(|d| d.is_ascii_hexdigit())
                    {
                        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
                    } else {
                        None
                    };
                    match decoded {
                        Some(decoded) => out.push(decoded),
                        None => {
                            return Err(ConfigError::ParseError {
                                message: format!("Malformed \\uXXXX escape: \\u{}", digits),
                                source: None,
                            })
                        }
                    }
                }
                Some(other) => out.push(other),
                None => {}
            }
        }

        Ok(out)
    }
}

impl PropertyParser for PropertiesParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
        let mut result = HashMap::new();

        for line in Self::logical_lines(content) {
            let (key, value) = Self::split_entry(&line)?;
            if key.is_empty() {
                continue;
            }
            result.insert(key, value);
        }

        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties", "config"]
    }
}

/// Property source backed by a `.properties` file.
///
/// # Priority
///
/// Property files have a priority of 1, the same as YAML files.
///
/// # Examples
///
/// ```rust,no_run
/// use cosmos_factory::adapters::PropertiesFileAdapter;
///
/// let adapter = PropertiesFileAdapter::from_file("telemetry.config").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PropertiesFileAdapter {
    file_path: PathBuf,
    values: HashMap<String, String>,
    parser: PropertiesParser,
}

impl PropertiesFileAdapter {
    /// Loads properties from the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let parser = PropertiesParser::new();
        let (file_path, content) = read_bounded(SOURCE_NAME, path.as_ref())?;
        let values = parser.parse(&content)?;

        Ok(Self {
            file_path,
            values,
            parser,
        })
    }

    /// Returns the canonical path of the file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl PropertySource for PropertiesFileAdapter {
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
