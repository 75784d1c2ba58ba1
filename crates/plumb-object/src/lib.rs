//! Object codec for the plumb object store.
//!
//! Three object kinds exist: blobs (raw file content), trees (directory
//! snapshots) and commits (history markers). Every object is identified by
//! the SHA-1 of its framed bytes, `"<kind> <len>\0<payload>"`. This crate
//! frames and unframes payloads, computes ids, and parses/serializes the
//! payload formats of each kind.

mod blob;
mod commit;
pub mod cursor;
pub mod header;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tree::{FileMode, Tree, TreeEntry};

use bstr::BString;
use plumb_hash::hasher::Hasher;
use plumb_hash::{HashError, ObjectId};

/// Errors produced while encoding or decoding objects.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("unsupported object kind: {0}")]
    UnsupportedKind(BString),

    #[error("malformed object: {reason}")]
    Malformed { reason: String },

    #[error("object length mismatch: header declares {declared} bytes, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("truncated tree at offset {offset}: needed {needed} more bytes, {remaining} remaining")]
    TruncatedTree {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("invalid commit: missing '{field}' header")]
    MissingCommitField { field: &'static str },

    #[error("invalid file mode: {0}")]
    InvalidFileMode(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ObjectError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// The three kinds of stored objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    /// Parse from the kind token in an object header.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            _ => Err(ObjectError::UnsupportedKind(BString::from(s))),
        }
    }

    /// The canonical header token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// An object as the store sees it: a kind plus an uninterpreted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub kind: ObjectKind,
    pub data: Vec<u8>,
}

impl RawObject {
    pub fn new(kind: ObjectKind, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// Unframe `"<kind> <len>\0<payload>"`. The payload must be exactly the
    /// declared length.
    pub fn from_framed(framed: &[u8]) -> Result<Self, ObjectError> {
        let (kind, declared, offset) = header::parse_header(framed)?;
        let payload = &framed[offset..];
        if payload.len() != declared {
            return Err(ObjectError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }
        Ok(Self::new(kind, payload))
    }

    /// The framed byte sequence that is hashed and stored.
    pub fn to_framed(&self) -> Vec<u8> {
        header::frame(self.kind, &self.data)
    }

    /// The content id of this object.
    pub fn compute_oid(&self) -> Result<ObjectId, HashError> {
        Hasher::hash_object(self.kind.as_str(), &self.data)
    }

    /// Interpret the payload according to its kind.
    pub fn decode(&self) -> Result<Object, ObjectError> {
        Object::parse_content(self.kind, &self.data)
    }
}

/// A decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    /// Parse from framed bytes (header + payload).
    pub fn parse(framed: &[u8]) -> Result<Self, ObjectError> {
        RawObject::from_framed(framed)?.decode()
    }

    /// Parse a payload with a known kind (no header).
    pub fn parse_content(kind: ObjectKind, content: &[u8]) -> Result<Self, ObjectError> {
        match kind {
            ObjectKind::Blob => Ok(Self::Blob(Blob::parse(content))),
            ObjectKind::Tree => Ok(Self::Tree(Tree::parse(content)?)),
            ObjectKind::Commit => Ok(Self::Commit(Commit::parse(content)?)),
        }
    }

    /// Serialize just the payload (no header).
    pub fn serialize_content(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.serialize_content().to_vec(),
            Self::Tree(t) => t.serialize_content(),
            Self::Commit(c) => c.serialize_content(),
        }
    }

    /// Serialize to framed bytes (header + payload).
    pub fn serialize(&self) -> Vec<u8> {
        header::frame(self.kind(), &self.serialize_content())
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
        }
    }

    /// Lower to the store representation.
    pub fn to_raw(&self) -> RawObject {
        RawObject::new(self.kind(), self.serialize_content())
    }

    /// Compute the id by hashing the framed form.
    pub fn compute_oid(&self) -> Result<ObjectId, HashError> {
        Hasher::hash_object(self.kind().as_str(), &self.serialize_content())
    }
}
