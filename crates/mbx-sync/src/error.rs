use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("profile matching failed: {0}")]
    Match(#[from] mbx_diff::DiffError),

    #[error("index error: {0}")]
    Index(#[from] mbx_index::IndexError),

    #[error("merge error: {0}")]
    Merge(#[from] mbx_merge::MergeError),
}

pub type SyncResult<T> = Result<T, SyncError>;
