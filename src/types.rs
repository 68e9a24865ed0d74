//! Core types for drive-mirror

use serde::{Deserialize, Serialize};

/// Opaque identifier of a remote file or folder
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    /// Create a new FileId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata snapshot of a remote item
///
/// Fetched on demand and never cached across identifiers. The remote API may list
/// several parents; only the first one is ever followed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteItem {
    /// Identifier of the item
    pub id: FileId,
    /// Display name (not unique among siblings)
    pub name: String,
    /// Parent identifiers as reported by the remote
    pub parents: Vec<FileId>,
}

impl RemoteItem {
    /// The parent that path resolution follows, if any
    pub fn first_parent(&self) -> Option<&FileId> {
        self.parents.first()
    }
}

/// Ancestor folder names of an item, root first, excluding the item itself
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedPath {
    segments: Vec<String>,
}

impl ResolvedPath {
    /// Build a path from root-first segments
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Folder names, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when the item sits at the hierarchy root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of ancestor folders
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The `/`-joined relative path (empty at the root)
    pub fn to_relative_path(&self) -> String {
        self.segments.join("/")
    }
}

impl std::fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_relative_path())
    }
}

/// Stage of a single job's pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    /// Looking up the requested file's name and parents
    FetchMetadata,
    /// Walking the ancestor chain
    ResolvePath,
    /// Opening the content stream
    Download,
    /// Creating folders and writing the file
    Write,
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStage::FetchMetadata => "fetch_metadata",
            JobStage::ResolvePath => "resolve_path",
            JobStage::Download => "download",
            JobStage::Write => "write",
        };
        f.write_str(s)
    }
}
