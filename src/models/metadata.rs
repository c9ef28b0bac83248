use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable snapshot of a note's observable attributes.
///
/// Produced once per evaluation by the host's metadata reader; the engine
/// never re-reads files. Absent or unreadable values are represented as
/// empty collections or `None`, never as an error — extraction failure
/// degrades to defaults upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileMetadata {
    /// File name including extension, e.g. `"recipe.md"`
    pub file_name: String,
    /// Vault-relative path including the file name
    pub file_path: String,
    /// File extension without the dot, e.g. `"md"`
    pub extension: String,
    /// All tags on the note, with or without a leading `#`
    pub tags: Vec<String>,
    /// Outgoing link targets
    pub links: Vec<String>,
    /// Embedded file references
    pub embeds: Vec<String>,
    /// Heading texts in document order
    pub headings: Vec<String>,
    /// Frontmatter properties; values keep their JSON shape
    pub properties: HashMap<String, serde_json::Value>,
    /// Full note body
    pub file_content: String,
    /// Created timestamp, `None` when the host could not read it
    pub created_at: Option<DateTime<Utc>>,
    /// Last modified timestamp, `None` when the host could not read it
    pub updated_at: Option<DateTime<Utc>>,
}

impl FileMetadata {
    /// Create a metadata snapshot from a vault-relative path, deriving
    /// `file_name` and `extension`. All other fields start empty.
    pub fn new(file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .rsplit('/')
            .next()
            .unwrap_or(file_path.as_str())
            .to_string();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();

        Self {
            file_name,
            file_path,
            extension,
            ..Self::default()
        }
    }

    /// Parent folder of the file, derived from `file_path`.
    ///
    /// Empty string for files at the vault root.
    pub fn folder(&self) -> &str {
        match self.file_path.rsplit_once('/') {
            Some((folder, _)) => folder,
            None => "",
        }
    }
}
