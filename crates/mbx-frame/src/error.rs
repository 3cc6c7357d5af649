//! Error types for the frame crate.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while framing or reading back records.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The container could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record span ran past the end of its container.
    #[error("short read in {path} at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        path: PathBuf,
        offset: u64,
        expected: u64,
        actual: u64,
    },
}

impl FrameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for frame results.
pub type FrameResult<T> = Result<T, FrameError>;
