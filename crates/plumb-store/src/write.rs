use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use plumb_hash::hasher::Hasher;
use plumb_hash::ObjectId;
use plumb_object::header;
use plumb_object::{Object, ObjectKind};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::{ObjectStore, StoreError};

impl ObjectStore {
    /// Store a decoded object. Returns its id.
    pub fn put_object(&self, obj: &Object) -> Result<ObjectId, StoreError> {
        self.put(obj.kind(), &obj.serialize_content())
    }

    /// Frame, hash, compress and persist a payload. Returns its id.
    ///
    /// A no-op if the object already exists. The object only becomes visible
    /// under its id once fully written (temp file + rename), so concurrent
    /// writers of the same content never observe a partial file.
    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, StoreError> {
        let hdr = header::write_header(kind, payload.len());

        let oid = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(payload);
            hasher.finalize()?
        };

        if self.contains(&oid) {
            trace!(%oid, %kind, "object already stored");
            return Ok(oid);
        }

        if !self.objects_dir.is_dir() {
            return Err(StoreError::Uninitialized {
                path: self.objects_dir.clone(),
            });
        }

        // Bucket creation tolerates another writer getting there first.
        let final_path = self.object_path(&oid);
        if let Some(bucket) = final_path.parent() {
            fs::create_dir_all(bucket)?;
        }

        let tmp = write_to_temp(&self.objects_dir, &hdr, payload, self.compression_level)?;
        finalize_object(tmp, &final_path)?;

        debug!(%oid, %kind, len = payload.len(), "object stored");
        Ok(oid)
    }
}

/// Compress header + payload into a temp file under `objects_dir`.
///
/// The temp file sits on the same filesystem as its destination so the final
/// rename is atomic. It is removed automatically if anything below fails.
fn write_to_temp(
    objects_dir: &Path,
    hdr: &[u8],
    payload: &[u8],
    level: flate2::Compression,
) -> Result<NamedTempFile, StoreError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("tmp_obj_")
        .tempfile_in(objects_dir)?;

    {
        let mut encoder = ZlibEncoder::new(&mut tmp, level);
        encoder.write_all(hdr)?;
        encoder.write_all(payload)?;
        encoder.finish()?;
    }
    tmp.as_file().sync_all()?;

    // Stored objects are immutable.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o444))?;
    }

    Ok(tmp)
}

/// Move a finished temp file to its destination.
///
/// If the rename fails because another writer already placed the same object
/// there, the temp file is dropped and the write counts as successful.
fn finalize_object(tmp: NamedTempFile, final_path: &Path) -> Result<(), StoreError> {
    match tmp.persist(final_path) {
        Ok(_) => Ok(()),
        Err(_) if final_path.is_file() => Ok(()),
        Err(e) => Err(StoreError::Io(e.error)),
    }
}
