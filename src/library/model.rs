use std::path::PathBuf;

use serde::Serialize;

/// Where a discovered file lives. Direct scans produce paths; document-tree
/// scans produce opaque uris.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Path(PathBuf),
    Uri(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFile {
    pub name: String,
    #[serde(flatten)]
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

/// Files found under one root, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub root: Location,
    pub files: Vec<AudioFile>,
}

impl ScanResult {
    pub fn count(&self) -> usize {
        self.files.len()
    }
}
