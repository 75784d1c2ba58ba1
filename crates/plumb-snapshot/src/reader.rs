use std::fmt;

use bstr::BString;
use plumb_hash::ObjectId;
use plumb_object::{FileMode, ObjectKind, Tree};
use plumb_store::ObjectStore;

use crate::{Result, SnapshotError};

/// Fetch and decode a tree object.
///
/// Fails with [`SnapshotError::NotATree`] if `oid` names a blob or commit.
pub fn read_tree(store: &ObjectStore, oid: &ObjectId) -> Result<Tree> {
    let raw = store.get(oid)?;
    if raw.kind != ObjectKind::Tree {
        return Err(SnapshotError::NotATree {
            oid: *oid,
            actual: raw.kind,
        });
    }
    Ok(Tree::parse(&raw.data)?)
}

/// One line of a verbose tree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub mode: FileMode,
    /// Kind of the child object, as recorded in the store.
    pub kind: ObjectKind,
    pub oid: ObjectId,
    pub name: BString,
}

/// `<mode> <kind> <hex>\t<name>`, mode zero-padded to six octal digits.
///
/// The padding is display-only: a subtree is stored as `40000` in tree
/// payloads (and hashed that way) but listed as `040000`.
impl fmt::Display for ListedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:06o} {} {}\t{}",
            self.mode.raw(),
            self.kind,
            self.oid,
            self.name
        )
    }
}

/// List a tree's entries in stored order, resolving each child's kind.
///
/// Kinds come from a header-only read of each child. Submodule links point
/// outside this store and take their kind from the mode instead.
pub fn list_tree(store: &ObjectStore, oid: &ObjectId) -> Result<Vec<ListedEntry>> {
    let tree = read_tree(store, oid)?;
    tree.entries
        .into_iter()
        .map(|entry| -> Result<ListedEntry> {
            let kind = match entry.mode {
                FileMode::Gitlink => ObjectKind::Commit,
                _ => store.read_header(&entry.oid)?.0,
            };
            Ok(ListedEntry {
                mode: entry.mode,
                kind,
                oid: entry.oid,
                name: entry.name,
            })
        })
        .collect()
}

/// Entry names only, in stored order. Needs no child lookups.
pub fn list_names(store: &ObjectStore, oid: &ObjectId) -> Result<Vec<BString>> {
    Ok(read_tree(store, oid)?
        .entries
        .into_iter()
        .map(|e| e.name)
        .collect())
}
