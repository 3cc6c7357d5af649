//! Error types for the index crate.

/// Errors that can occur while indexing a container.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Framing the container failed.
    #[error(transparent)]
    Frame(#[from] mbx_frame::FrameError),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
