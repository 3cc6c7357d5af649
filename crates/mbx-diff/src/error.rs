//! Error types for the diff crate.

use std::path::PathBuf;

/// Errors that can occur while matching profile trees.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A profile root does not exist or is not a directory.
    #[error("profile root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Walking a profile tree failed.
    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A walked path did not sit under its root.
    #[error(transparent)]
    Type(#[from] mbx_types::TypeError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
