//! Error types for the merge crate.

use std::io;
use std::path::PathBuf;

use mbx_types::ContainerKind;

/// Errors that can occur while merging a matched pair.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Reading a record back from its source failed.
    #[error(transparent)]
    Frame(#[from] mbx_frame::FrameError),

    /// Indexing one side of the pair failed.
    #[error(transparent)]
    Index(#[from] mbx_index::IndexError),

    /// Appending to the destination failed.
    #[error("failed to append to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record's locator does not fit the container kind being merged.
    #[error("record locator does not match a {0}")]
    LocatorMismatch(ContainerKind),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
