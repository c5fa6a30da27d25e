//! Parsed localization entries and their identities.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::L10nStatsError;
use crate::Result;

/// Localization file formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// XML DTD entity files (`.dtd`)
    Dtd,
    /// Fluent files (`.ftl`)
    Fluent,
    /// Preprocessor define files (`.inc`)
    Defines,
    /// INI files (`.ini`)
    Ini,
    /// Java-style properties files (`.properties`)
    Properties,
}

impl Format {
    /// Detect the format from a file name or path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("dtd") => Ok(Self::Dtd),
            Some("ftl") => Ok(Self::Fluent),
            Some("inc") => Ok(Self::Defines),
            Some("ini") => Ok(Self::Ini),
            Some("properties") => Ok(Self::Properties),
            _ => Err(L10nStatsError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A named sub-value of a structured entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub raw_value: String,
}

/// A single-valued entry (DTD entity, property, INI key, define).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleEntry {
    pub name: String,
    pub raw_value: String,
}

/// A Fluent message or term: an optional value plus ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredEntry {
    pub name: String,
    pub raw_value: String,
    pub attributes: Vec<Attribute>,
}

/// One localizable unit parsed from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Simple(SimpleEntry),
    Structured(StructuredEntry),
}

impl Entry {
    /// Build a simple entry.
    pub fn simple(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self::Simple(SimpleEntry {
            name: name.into(),
            raw_value: raw_value.into(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Simple(e) => &e.name,
            Self::Structured(e) => &e.name,
        }
    }

    pub fn raw_value(&self) -> &str {
        match self {
            Self::Simple(e) => &e.raw_value,
            Self::Structured(e) => &e.raw_value,
        }
    }

    /// Attributes of a structured entry; empty for simple entries.
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::Simple(_) => &[],
            Self::Structured(e) => &e.attributes,
        }
    }

    /// Flatten the entry into `(identity, raw value)` pairs for a file.
    ///
    /// Simple entries yield one unit. Structured entries yield their own
    /// value (when it is not empty) followed by one unit per attribute.
    pub fn units(&self, relative_path: &str) -> Vec<(String, String)> {
        match self {
            Self::Simple(e) => vec![(entry_identity(relative_path, &e.name), e.raw_value.clone())],
            Self::Structured(e) => {
                let mut units = Vec::with_capacity(e.attributes.len() + 1);
                if !e.raw_value.is_empty() {
                    units.push((entry_identity(relative_path, &e.name), e.raw_value.clone()));
                }
                for attr in &e.attributes {
                    units.push((
                        attribute_identity(relative_path, &e.name, &attr.name),
                        attr.raw_value.clone(),
                    ));
                }
                units
            }
        }
    }
}

/// Output of a format parser: a valid entry or unparseable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedItem {
    Entry(Entry),
    /// Content the parser could not make sense of; never counted
    Junk(String),
}

/// Identity of a top-level entry: `path:name`.
pub fn entry_identity(relative_path: &str, name: &str) -> String {
    format!("{relative_path}:{name}")
}

/// Identity of an attribute: `path:name.attribute`.
pub fn attribute_identity(relative_path: &str, name: &str, attribute: &str) -> String {
    format!("{relative_path}:{name}.{attribute}")
}

/// The file part of an identity (everything before the first `:`).
pub fn identity_file(identity: &str) -> &str {
    identity.split_once(':').map_or(identity, |(file, _)| file)
}
