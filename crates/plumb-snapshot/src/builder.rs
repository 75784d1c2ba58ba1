use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use bstr::BString;
use plumb_hash::ObjectId;
use plumb_object::{FileMode, ObjectKind, Tree, TreeEntry};
use plumb_store::ObjectStore;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{Result, SnapshotError};

/// Snapshot `dir` into the store with no ignored names.
///
/// Returns `None` when the directory holds nothing storable: no regular
/// files or symlinks anywhere beneath it.
pub fn build_tree(store: &ObjectStore, dir: &Path) -> Result<Option<ObjectId>> {
    TreeBuilder::new(store).build(dir)
}

/// Recursive directory-to-tree conversion.
///
/// Siblings are hashed and stored in parallel. Subtrees are written before
/// the tree that references them, so every stored tree only ever points at
/// objects that already exist.
///
/// Directories with no storable descendants produce no tree object and no
/// entry in their parent.
pub struct TreeBuilder<'a> {
    store: &'a ObjectStore,
    ignored: Vec<OsString>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        Self {
            store,
            ignored: Vec::new(),
        }
    }

    /// Skip entries with this exact name at every level.
    pub fn ignore(mut self, name: impl Into<OsString>) -> Self {
        self.ignored.push(name.into());
        self
    }

    pub fn build(&self, dir: &Path) -> Result<Option<ObjectId>> {
        let oid = self.build_dir(dir)?;
        match &oid {
            Some(oid) => debug!(%oid, dir = %dir.display(), "snapshot complete"),
            None => debug!(dir = %dir.display(), "nothing to snapshot"),
        }
        Ok(oid)
    }

    fn build_dir(&self, dir: &Path) -> Result<Option<ObjectId>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| SnapshotError::io(dir, e))? {
            let entry = entry.map_err(|e| SnapshotError::io(dir, e))?;
            let name = entry.file_name();
            if self.is_ignored(&name) {
                trace!(name = ?name, "ignored");
                continue;
            }
            children.push((entry.path(), name));
        }

        let entries = children
            .par_iter()
            .map(|(path, name)| self.build_entry(path, name))
            .collect::<Result<Vec<Option<TreeEntry>>>>()?;
        let entries: Vec<TreeEntry> = entries.into_iter().flatten().collect();

        if entries.is_empty() {
            return Ok(None);
        }

        let tree = Tree::from_entries(entries);
        let oid = self.store.put(ObjectKind::Tree, &tree.serialize_content())?;
        trace!(%oid, entries = tree.len(), dir = %dir.display(), "tree stored");
        Ok(Some(oid))
    }

    fn build_entry(&self, path: &Path, name: &OsStr) -> Result<Option<TreeEntry>> {
        let meta = fs::symlink_metadata(path).map_err(|e| SnapshotError::io(path, e))?;
        let file_type = meta.file_type();
        let name = BString::from(name.as_encoded_bytes());

        if file_type.is_dir() {
            return Ok(self
                .build_dir(path)?
                .map(|oid| TreeEntry::new(FileMode::Tree, name, oid)));
        }

        let (mode, content) = if file_type.is_symlink() {
            let target = fs::read_link(path).map_err(|e| SnapshotError::io(path, e))?;
            (
                FileMode::Symlink,
                target.as_os_str().as_encoded_bytes().to_vec(),
            )
        } else if file_type.is_file() {
            let content = fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
            (file_mode_from_metadata(&meta), content)
        } else {
            warn!(path = %path.display(), "skipping unsupported file type");
            return Ok(None);
        };

        let oid = self.store.put(ObjectKind::Blob, &content)?;
        trace!(%oid, path = %path.display(), "blob stored");
        Ok(Some(TreeEntry::new(mode, name, oid)))
    }

    fn is_ignored(&self, name: &OsStr) -> bool {
        self.ignored.iter().any(|ignored| ignored == name)
    }
}

/// Any execute bit marks a regular file executable.
fn file_mode_from_metadata(meta: &fs::Metadata) -> FileMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 != 0 {
            return FileMode::Executable;
        }
    }
    #[cfg(not(unix))]
    let _ = meta;
    FileMode::Regular
}
