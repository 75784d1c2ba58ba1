use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use plumb_hash::{ObjectId, DIGEST_LEN};

use crate::cursor::ByteCursor;
use crate::{ObjectError, ObjectKind};

/// File mode for tree entries.
///
/// Only the canonical ASCII spellings are accepted; in particular a directory
/// is `40000`, never `040000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Submodule link (160000), only ever seen in trees written by other tools
    Gitlink,
    /// Subdirectory (40000)
    Tree,
}

impl FileMode {
    /// Parse from the canonical ASCII form (e.g., `b"100644"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"100644" => Ok(Self::Regular),
            b"100755" => Ok(Self::Executable),
            b"120000" => Ok(Self::Symlink),
            b"160000" => Ok(Self::Gitlink),
            b"40000" => Ok(Self::Tree),
            _ => Err(ObjectError::InvalidFileMode(
                String::from_utf8_lossy(s).into_owned(),
            )),
        }
    }

    /// The canonical ASCII form written into tree payloads.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Regular => b"100644",
            Self::Executable => b"100755",
            Self::Symlink => b"120000",
            Self::Gitlink => b"160000",
            Self::Tree => b"40000",
        }
    }

    /// The numeric mode value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// The kind of object an entry with this mode points at.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Tree => ObjectKind::Tree,
            Self::Gitlink => ObjectKind::Commit,
            Self::Regular | Self::Executable | Self::Symlink => ObjectKind::Blob,
        }
    }
}

/// A single `(mode, name, child-hash)` entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    /// A single path segment; never contains `/` or a null byte.
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entries order by name bytes alone, ascending.
impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .as_bytes()
            .cmp(other.name.as_bytes())
            .then_with(|| self.mode.raw().cmp(&other.mode.raw()))
            .then_with(|| self.oid.cmp(&other.oid))
    }
}

/// A tree object: a directory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from entries in any order; they are sorted by name.
    pub fn from_entries(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    /// Parse a tree payload.
    ///
    /// Each entry is `<mode> <name>\0` followed by exactly 20 raw hash bytes.
    /// Parsing stops only when the payload is consumed exactly; an entry cut
    /// short anywhere fails with [`ObjectError::TruncatedTree`].
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut cur = ByteCursor::new(content);

        while !cur.is_empty() {
            let entry_start = cur.position();

            let mode_and_name = cur.read_until(0).ok_or(ObjectError::TruncatedTree {
                offset: entry_start,
                needed: 1 + DIGEST_LEN,
                remaining: cur.remaining(),
            })?;

            let space = mode_and_name
                .find_byte(b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: entry_start,
                    reason: "missing space after mode".into(),
                })?;
            let (mode, name) = (&mode_and_name[..space], &mode_and_name[space + 1..]);

            let mode = FileMode::from_bytes(mode).map_err(|_| ObjectError::InvalidTreeEntry {
                offset: entry_start,
                reason: format!("invalid mode {:?}", mode.as_bstr()),
            })?;

            if name.is_empty() || name.contains(&b'/') {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: entry_start,
                    reason: format!("invalid entry name {:?}", name.as_bstr()),
                });
            }

            let hash_start = cur.position();
            let hash = cur
                .read_exact(DIGEST_LEN)
                .ok_or(ObjectError::TruncatedTree {
                    offset: hash_start,
                    needed: DIGEST_LEN,
                    remaining: cur.remaining(),
                })?;

            entries.push(TreeEntry {
                mode,
                name: BString::from(name),
                oid: ObjectId::from_bytes(hash)?,
            });
        }

        Ok(Self { entries })
    }

    /// Serialize the payload, writing entries in name order.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut sorted: Vec<&TreeEntry> = self.entries.iter().collect();
        sorted.sort();

        let mut out = Vec::new();
        for entry in sorted {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// Lookup an entry by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(last: u8) -> ObjectId {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        ObjectId::new(bytes)
    }

    #[test]
    fn file_mode_canonical_forms() {
        for mode in [
            FileMode::Regular,
            FileMode::Executable,
            FileMode::Symlink,
            FileMode::Gitlink,
            FileMode::Tree,
        ] {
            assert_eq!(FileMode::from_bytes(mode.as_bytes()).unwrap(), mode);
            assert_eq!(format!("{:o}", mode.raw()).as_bytes(), mode.as_bytes());
        }
    }

    #[test]
    fn zero_padded_directory_mode_rejected() {
        assert!(FileMode::from_bytes(b"040000").is_err());
        assert!(FileMode::from_bytes(b"100664").is_err());
    }

    #[test]
    fn mode_object_kinds() {
        assert_eq!(FileMode::Tree.object_kind(), ObjectKind::Tree);
        assert_eq!(FileMode::Executable.object_kind(), ObjectKind::Blob);
        assert_eq!(FileMode::Gitlink.object_kind(), ObjectKind::Commit);
    }

    #[test]
    fn directories_sort_by_plain_name() {
        // No implicit trailing '/' for directories: "foo" < "foo.c".
        let dir = TreeEntry::new(FileMode::Tree, "foo", oid(1));
        let file = TreeEntry::new(FileMode::Regular, "foo.c", oid(2));
        assert_eq!(dir.cmp(&file), Ordering::Less);
    }

    #[test]
    fn parse_empty_tree() {
        assert!(Tree::parse(b"").unwrap().is_empty());
    }

    #[test]
    fn parse_single_entry() {
        let id = oid(7);
        let mut data = Vec::new();
        data.extend_from_slice(b"100644 hello.txt\0");
        data.extend_from_slice(id.as_bytes());

        let tree = Tree::parse(&data).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.entries[0].mode, FileMode::Regular);
        assert_eq!(tree.entries[0].name, "hello.txt");
        assert_eq!(tree.entries[0].oid, id);
    }

    #[test]
    fn name_may_contain_spaces() {
        let mut data = Vec::new();
        data.extend_from_slice(b"100644 my file.txt\0");
        data.extend_from_slice(oid(1).as_bytes());
        let tree = Tree::parse(&data).unwrap();
        assert_eq!(tree.entries[0].name, "my file.txt");
    }

    #[test]
    fn hash_cut_short_is_truncated() {
        let mut data = Vec::new();
        data.extend_from_slice(b"100644 a\0");
        data.extend_from_slice(&oid(1).as_bytes()[..12]);
        let err = Tree::parse(&data).unwrap_err();
        assert!(matches!(
            err,
            ObjectError::TruncatedTree {
                offset: 9,
                needed: 20,
                remaining: 12
            }
        ));
    }

    #[test]
    fn trailing_partial_entry_is_truncated() {
        let mut data = Vec::new();
        data.extend_from_slice(b"100644 a\0");
        data.extend_from_slice(oid(1).as_bytes());
        data.extend_from_slice(b"100644 b");
        let err = Tree::parse(&data).unwrap_err();
        assert!(matches!(err, ObjectError::TruncatedTree { offset: 29, .. }));
    }

    #[test]
    fn missing_space_is_invalid() {
        let mut data = Vec::new();
        data.extend_from_slice(b"100644\0");
        data.extend_from_slice(oid(1).as_bytes());
        assert!(matches!(
            Tree::parse(&data),
            Err(ObjectError::InvalidTreeEntry { offset: 0, .. })
        ));
    }

    #[test]
    fn slash_in_name_is_invalid() {
        let mut data = Vec::new();
        data.extend_from_slice(b"100644 a/b\0");
        data.extend_from_slice(oid(1).as_bytes());
        assert!(matches!(
            Tree::parse(&data),
            Err(ObjectError::InvalidTreeEntry { .. })
        ));
    }

    #[test]
    fn serialize_sorts_by_name() {
        let tree = Tree {
            entries: vec![
                TreeEntry::new(FileMode::Regular, "b.txt", oid(2)),
                TreeEntry::new(FileMode::Tree, "a-dir", oid(1)),
            ],
        };

        let parsed = Tree::parse(&tree.serialize_content()).unwrap();
        assert_eq!(parsed.entries[0].name, "a-dir");
        assert_eq!(parsed.entries[1].name, "b.txt");
    }

    #[test]
    fn serialized_entry_layout() {
        let tree = Tree::from_entries(vec![TreeEntry::new(FileMode::Tree, "src", oid(9))]);
        let bytes = tree.serialize_content();
        assert_eq!(&bytes[..10], b"40000 src\0");
        assert_eq!(&bytes[10..], oid(9).as_bytes());
    }

    #[test]
    fn find_entry() {
        let tree = Tree::from_entries(vec![
            TreeEntry::new(FileMode::Regular, "README.md", oid(1)),
            TreeEntry::new(FileMode::Tree, "src", oid(2)),
        ]);
        assert!(tree.find(BStr::new("README.md")).is_some());
        assert!(tree.find(BStr::new("nonexistent")).is_none());
    }
}
