//! Error types for project structure and chapter content operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the project core
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Unknown item id or missing file
    #[error("not found: {0}")]
    NotFound(String),

    /// Manifest exists but could not be deserialized
    #[error("invalid manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File create/write/delete failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Empty or unusable topic/title
    #[error("invalid input: {0}")]
    Validation(String),

    /// Only the most recently added chapter may be deleted
    #[error("only the latest chapter can be deleted (latest is {latest})")]
    NotLatestChapter { latest: String },

    /// New projects must be created in an empty directory
    #[error("directory is not empty: {}", .0.display())]
    NotEmptyDirectory(PathBuf),
}

impl ProjectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Failures writing the manifest leave the on-disk structure out of sync
    /// with memory and must be surfaced as blocking.
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::Io { path, .. } if path.ends_with(super::structure::MANIFEST_FILE))
    }
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, ProjectError>;
