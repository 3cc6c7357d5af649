use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("path {path} is not under tree root {root}")]
    OutsideRoot { path: String, root: String },
}
