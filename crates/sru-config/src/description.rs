//! Descriptive metadata rendered into explain records.
//!
//! The description is optional and read from a JSON document named by
//! `description_path`. Every section may be omitted.

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a server description.
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// The description file could not be read.
    #[error("failed to read server description '{path}': {source}")]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The description file is not valid JSON of the expected shape.
    #[error("failed to parse server description '{path}': {source}")]
    Parse {
        /// File that was parsed.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: Arc<serde_json::Error>,
    },
}

/// A human-readable string with an optional language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalizedString {
    /// Language of the text, e.g. `en`.
    pub lang: Option<String>,
    /// Whether this is the preferred variant.
    pub primary: bool,
    /// The text.
    pub value: String,
}

impl LocalizedString {
    /// Creates an untagged, non-primary string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            lang: None,
            primary: false,
            value: value.into(),
        }
    }
}

/// Metadata about the database served.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseInfo {
    /// Titles of the database.
    pub titles: Vec<LocalizedString>,
    /// Free-text descriptions.
    pub descriptions: Vec<LocalizedString>,
    /// Author or maintainer.
    pub author: Option<String>,
    /// Contact details.
    pub contact: Option<String>,
    /// Usage restrictions.
    pub restrictions: Vec<LocalizedString>,
}

impl DatabaseInfo {
    /// Returns `true` when no database metadata is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
            && self.descriptions.is_empty()
            && self.author.is_none()
            && self.contact.is_none()
            && self.restrictions.is_empty()
    }
}

/// A context set an index belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexSet {
    /// Context set identifier URI.
    pub identifier: String,
    /// Short name used as an index prefix.
    pub name: String,
}

/// Maps an index onto a context set name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexMap {
    /// Short name of the context set.
    pub set: String,
    /// Index name within the set.
    pub name: String,
    /// Whether this is the preferred mapping.
    pub primary: bool,
}

/// One searchable index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexInfo {
    /// Optional index identifier.
    pub id: Option<String>,
    /// Titles of the index.
    pub titles: Vec<LocalizedString>,
    /// Context set mappings.
    pub maps: Vec<IndexMap>,
    /// Whether the index can be searched.
    pub searchable: bool,
    /// Whether the index can be scanned.
    pub scanable: bool,
    /// Whether the index can be sorted on.
    pub sortable: bool,
}

impl Default for IndexInfo {
    fn default() -> Self {
        Self {
            id: None,
            titles: Vec::new(),
            maps: Vec::new(),
            searchable: true,
            scanable: true,
            sortable: false,
        }
    }
}

/// One retrievable record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaInfo {
    /// Schema identifier URI.
    pub identifier: String,
    /// Short name clients may use in `recordSchema`.
    pub name: String,
    /// Location of the schema definition.
    pub location: Option<String>,
    /// Titles of the schema.
    pub titles: Vec<LocalizedString>,
    /// Whether records can be retrieved in this schema.
    pub retrieve: bool,
    /// Whether results can be sorted by this schema.
    pub sort: bool,
}

impl Default for SchemaInfo {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            name: String::new(),
            location: None,
            titles: Vec::new(),
            retrieve: true,
            sort: false,
        }
    }
}

/// Descriptive metadata for the explain record.
///
/// # Example
///
/// ```
/// use sru_config::ServerDescription;
///
/// let description = ServerDescription::from_json(
///     r#"{ "database": { "titles": [{ "value": "Catalogue", "primary": true }] } }"#,
/// )
/// .expect("valid description");
/// assert_eq!(description.database.titles.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerDescription {
    /// Database metadata.
    pub database: DatabaseInfo,
    /// Context sets referenced by the indexes.
    pub index_sets: Vec<IndexSet>,
    /// Searchable indexes.
    pub indexes: Vec<IndexInfo>,
    /// Retrievable schemas.
    pub schemas: Vec<SchemaInfo>,
}

impl ServerDescription {
    /// Parses a description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is not a valid description.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads a description from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Read`] if the file cannot be read and
    /// [`DescriptionError::Parse`] if it is not a valid description.
    pub fn load(path: &Utf8Path) -> Result<Self, DescriptionError> {
        let text = fs::read_to_string(path).map_err(|source| DescriptionError::Read {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        Self::from_json(&text).map_err(|source| DescriptionError::Parse {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })
    }

    /// Returns `true` when an index section should be written.
    #[must_use]
    pub fn has_index_info(&self) -> bool {
        !self.index_sets.is_empty() || !self.indexes.is_empty()
    }
}
