//! Content-addressed object storage.
//!
//! Each object lives at `objects/XX/YYYY...` where `XX` is the first byte of
//! its id in hex and `YYYY...` is the remaining 38 hex characters. The file
//! content is the zlib-compressed framed form `"<kind> <len>\0<payload>"`.
//!
//! The store never creates its own root: [`ObjectStore::open`] fails with
//! [`StoreError::Uninitialized`] until a repository has been initialized.

mod read;
mod write;

use std::path::{Path, PathBuf};

use plumb_hash::{HashError, ObjectId};

/// Handle to one object directory.
///
/// Cheap to share between threads; every operation is a self-contained
/// unit of file I/O.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
    compression_level: flate2::Compression,
}

impl ObjectStore {
    /// Open the store rooted at `objects_dir`, which must already exist.
    pub fn open(objects_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let objects_dir = objects_dir.as_ref();
        if !objects_dir.is_dir() {
            return Err(StoreError::Uninitialized {
                path: objects_dir.to_path_buf(),
            });
        }
        Ok(Self {
            objects_dir: objects_dir.to_path_buf(),
            compression_level: flate2::Compression::default(),
        })
    }

    /// Set the zlib compression level (0–9). Values above 9 are clamped.
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = flate2::Compression::new(level.min(9));
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level.level()
    }

    /// Root of the object directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// The file path for a given id.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        let (bucket, entry) = oid.bucket_and_entry();
        self.objects_dir.join(bucket).join(entry)
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object store not initialized: {} does not exist", path.display())]
    Uninitialized { path: PathBuf },

    #[error("object not found: {oid}")]
    NotFound { oid: ObjectId },

    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: ObjectId, reason: String },

    #[error("decompression error for {oid}: {source}")]
    Decompress {
        oid: ObjectId,
        #[source]
        source: std::io::Error,
    },

    #[error("hash mismatch for {}: expected {expected}, got {actual}", path.display())]
    HashMismatch {
        path: PathBuf,
        expected: ObjectId,
        actual: ObjectId,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("hash error: {0}")]
    Hash(#[from] HashError),
}
