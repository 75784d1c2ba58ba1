use std::path::PathBuf;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a plumb repository (or any of the parent directories): {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid store directory: {}: {reason}", path.display())]
    InvalidStoreDir { path: PathBuf, reason: String },

    #[error("bare repository has no working tree")]
    BareNoWorkTree,

    #[error("unable to read HEAD: {0}")]
    InvalidHead(String),

    #[error(transparent)]
    Identity(#[from] plumb_utils::error::UtilError),

    #[error(transparent)]
    Store(#[from] plumb_store::StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
