//! Wire types for the subset of the Drive v2 JSON API this tool talks to.

use serde::{Deserialize, Serialize};

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Reference to a containing folder, as sent in upload metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParentReference {
    pub id: String,
}

/// Metadata for a new remote object, fixed before the transfer starts.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub title: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentReference>,
}

impl FileMetadata {
    pub fn new(title: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            mime_type: mime_type.into(),
            parents: Vec::new(),
        }
    }

    pub fn with_parent(mut self, folder_id: impl Into<String>) -> Self {
        self.parents = vec![ParentReference { id: folder_id.into() }];
        self
    }
}

/// One entry of a file listing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Drive v2 serializes int64 fields as JSON strings.
    #[serde(default, deserialize_with = "int64_string::deserialize")]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub md5_checksum: Option<String>,
    #[serde(default)]
    pub modified_date: Option<String>,
    #[serde(default)]
    pub last_modifying_user_name: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Response body of a `files.list` query.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub items: Vec<FileEntry>,
}

/// Drive v2 `long` fields arrive as `"123"`; tolerate plain numbers too.
mod int64_string {
    use serde::de::{Deserializer, Error, Unexpected};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Long {
        Num(u64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Long>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Long::Num(n)) => Ok(Some(n)),
            Some(Long::Str(s)) => s
                .parse::<u64>()
                .map(Some)
                .map_err(|_| D::Error::invalid_value(Unexpected::Str(&s), &"an int64 string")),
        }
    }
}
