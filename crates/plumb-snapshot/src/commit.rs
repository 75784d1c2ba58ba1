use bstr::BString;
use plumb_hash::ObjectId;
use plumb_object::{Commit, Object, ObjectKind};
use plumb_store::ObjectStore;
use plumb_utils::date::Signature;
use tracing::debug;

use crate::{Result, SnapshotError};

/// Record `tree` (and optionally `parent`) as a new commit.
///
/// `author` is used for both the author and committer lines. The message is
/// stored with trailing newlines collapsed to exactly one. The tree must
/// exist and be a tree; the parent, if given, must exist and be a commit.
pub fn write_commit(
    store: &ObjectStore,
    tree: &ObjectId,
    parent: Option<&ObjectId>,
    message: &[u8],
    author: &Signature,
) -> Result<ObjectId> {
    let (kind, _) = store.read_header(tree)?;
    if kind != ObjectKind::Tree {
        return Err(SnapshotError::NotATree {
            oid: *tree,
            actual: kind,
        });
    }

    if let Some(parent) = parent {
        let (kind, _) = store.read_header(parent)?;
        if kind != ObjectKind::Commit {
            return Err(SnapshotError::NotACommit {
                oid: *parent,
                actual: kind,
            });
        }
    }

    let commit = Commit {
        tree: *tree,
        parent: parent.copied(),
        author: author.clone(),
        committer: author.clone(),
        message: normalize_message(message),
    };

    let oid = store.put_object(&Object::Commit(commit))?;
    debug!(%oid, %tree, parent = ?parent.map(ObjectId::to_hex), "commit written");
    Ok(oid)
}

fn normalize_message(message: &[u8]) -> BString {
    let end = message
        .iter()
        .rposition(|&b| b != b'\n')
        .map_or(0, |pos| pos + 1);
    let mut out = BString::from(&message[..end]);
    out.push(b'\n');
    out
}
