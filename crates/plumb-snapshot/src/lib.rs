//! Directory snapshots on top of the object store.
//!
//! - [`build_tree`] / [`TreeBuilder`] turn a directory into blob and tree
//!   objects and return the root tree id.
//! - [`read_tree`] and [`list_tree`] decode a stored tree back into entries.
//! - [`write_commit`] records a tree (and optional parent) as a commit.

mod builder;
mod commit;
mod reader;

pub use builder::{build_tree, TreeBuilder};
pub use commit::write_commit;
pub use reader::{list_names, list_tree, read_tree, ListedEntry};

use std::path::PathBuf;

use plumb_hash::ObjectId;
use plumb_object::{ObjectError, ObjectKind};
use plumb_store::StoreError;

/// Errors from snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("{oid} is a {actual}, not a tree")]
    NotATree { oid: ObjectId, actual: ObjectKind },

    #[error("{oid} is a {actual}, not a commit")]
    NotACommit { oid: ObjectId, actual: ObjectKind },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Object(#[from] ObjectError),
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
