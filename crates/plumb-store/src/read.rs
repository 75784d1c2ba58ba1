use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use plumb_hash::hasher::Hasher;
use plumb_hash::ObjectId;
use plumb_object::header;
use plumb_object::{ObjectKind, RawObject};
use tracing::trace;

use crate::{ObjectStore, StoreError};

/// Inflated headers are far shorter than this; anything longer is corrupt.
const MAX_HEADER_LEN: usize = 64;

impl ObjectStore {
    /// Check if an object exists.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read an object by id.
    ///
    /// Fails with [`StoreError::NotFound`] if nothing is stored under `oid`,
    /// with [`StoreError::Uninitialized`] if the store root has gone away,
    /// and with [`StoreError::Decompress`] or [`StoreError::Corrupt`] if the
    /// stored bytes do not inflate to a well-formed framed object.
    pub fn get(&self, oid: &ObjectId) -> Result<RawObject, StoreError> {
        let framed = self.read_inflated(oid)?;
        unframe(oid, &framed)
    }

    /// Read an object and verify that its bytes still hash to `oid`.
    pub fn get_verified(&self, oid: &ObjectId) -> Result<RawObject, StoreError> {
        let framed = self.read_inflated(oid)?;

        let actual = Hasher::digest(&framed)?;
        if actual != *oid {
            return Err(StoreError::HashMismatch {
                path: self.object_path(oid),
                expected: *oid,
                actual,
            });
        }

        unframe(oid, &framed)
    }

    /// Read just the kind and payload length, inflating only the header.
    pub fn read_header(&self, oid: &ObjectId) -> Result<(ObjectKind, usize), StoreError> {
        let compressed = self.read_compressed(oid)?;

        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut buf = [0u8; MAX_HEADER_LEN];
        let mut filled = 0;

        loop {
            if filled >= buf.len() {
                return Err(corrupt(oid, format!("header exceeds {MAX_HEADER_LEN} bytes")));
            }
            let n = decoder
                .read(&mut buf[filled..])
                .map_err(|source| StoreError::Decompress { oid: *oid, source })?;
            if n == 0 {
                return Err(corrupt(oid, "unexpected EOF before header null terminator"));
            }
            filled += n;
            if buf[..filled].contains(&0) {
                break;
            }
        }

        let (kind, size, _) =
            header::parse_header(&buf[..filled]).map_err(|e| corrupt(oid, e.to_string()))?;
        trace!(%oid, %kind, size, "read object header");
        Ok((kind, size))
    }

    fn read_compressed(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.object_path(oid)) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if !self.objects_dir.is_dir() {
                    return Err(StoreError::Uninitialized {
                        path: self.objects_dir.clone(),
                    });
                }
                Err(StoreError::NotFound { oid: *oid })
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn read_inflated(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        let compressed = self.read_compressed(oid)?;
        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut framed = Vec::new();
        decoder
            .read_to_end(&mut framed)
            .map_err(|source| StoreError::Decompress { oid: *oid, source })?;
        Ok(framed)
    }
}

fn unframe(oid: &ObjectId, framed: &[u8]) -> Result<RawObject, StoreError> {
    let raw = RawObject::from_framed(framed).map_err(|e| corrupt(oid, e.to_string()))?;
    trace!(%oid, kind = %raw.kind, len = raw.data.len(), "read object");
    Ok(raw)
}

fn corrupt(oid: &ObjectId, reason: impl Into<String>) -> StoreError {
    StoreError::Corrupt {
        oid: *oid,
        reason: reason.into(),
    }
}
