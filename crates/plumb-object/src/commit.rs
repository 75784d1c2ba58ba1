use bstr::{BStr, BString, ByteSlice};
use plumb_hash::ObjectId;
use plumb_utils::date::Signature;

use crate::ObjectError;

/// A commit object.
///
/// References exactly one tree and at most one parent. The payload layout is
/// fixed: `tree`, optional `parent`, `author`, `committer`, a blank line,
/// then the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Id of the root tree.
    pub tree: ObjectId,
    /// Parent commit, `None` for a root commit.
    pub parent: Option<ObjectId>,
    pub author: Signature,
    pub committer: Signature,
    /// Everything after the blank separator line, verbatim.
    pub message: BString,
}

impl Commit {
    /// Parse a commit payload (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut tree: Option<ObjectId> = None;
        let mut parent: Option<ObjectId> = None;
        let mut author: Option<Signature> = None;
        let mut committer: Option<Signature> = None;

        let mut rest = content;
        loop {
            let (line, after) = match rest.find_byte(b'\n') {
                Some(pos) => (&rest[..pos], &rest[pos + 1..]),
                None => return Err(ObjectError::malformed("commit has no message separator")),
            };
            rest = after;

            if line.is_empty() {
                break;
            }

            let (key, value) = line
                .split_once_str(b" ")
                .ok_or_else(|| ObjectError::malformed(format!("bad commit header line {:?}", line.as_bstr())))?;

            match key {
                b"tree" if tree.is_none() => tree = Some(parse_hex_oid(value, "tree")?),
                b"parent" if parent.is_none() => parent = Some(parse_hex_oid(value, "parent")?),
                b"parent" => return Err(ObjectError::malformed("commit has more than one parent")),
                b"author" if author.is_none() => author = Some(parse_signature(value)?),
                b"committer" if committer.is_none() => committer = Some(parse_signature(value)?),
                _ => {
                    return Err(ObjectError::malformed(format!(
                        "unexpected commit header {:?}",
                        key.as_bstr()
                    )))
                }
            }
        }

        Ok(Self {
            tree: tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?,
            parent,
            author: author.ok_or(ObjectError::MissingCommitField { field: "author" })?,
            committer: committer.ok_or(ObjectError::MissingCommitField { field: "committer" })?,
            message: BString::from(rest),
        })
    }

    /// Serialize the payload.
    ///
    /// The `parent` line is omitted entirely for root commits.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"tree ");
        out.extend_from_slice(self.tree.to_hex().as_bytes());
        out.push(b'\n');

        if let Some(parent) = &self.parent {
            out.extend_from_slice(b"parent ");
            out.extend_from_slice(parent.to_hex().as_bytes());
            out.push(b'\n');
        }

        out.extend_from_slice(b"author ");
        out.extend_from_slice(&self.author.to_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"committer ");
        out.extend_from_slice(&self.committer.to_bytes());
        out.push(b'\n');

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        out
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The first line of the message.
    pub fn summary(&self) -> &BStr {
        let msg: &[u8] = self.message.as_ref();
        match msg.find_byte(b'\n') {
            Some(pos) => BStr::new(&msg[..pos]),
            None => BStr::new(msg),
        }
    }
}

fn parse_hex_oid(value: &[u8], field: &str) -> Result<ObjectId, ObjectError> {
    let hex = std::str::from_utf8(value)
        .map_err(|_| ObjectError::malformed(format!("non-UTF-8 {field} id")))?;
    Ok(ObjectId::from_hex(hex)?)
}

fn parse_signature(data: &[u8]) -> Result<Signature, ObjectError> {
    Signature::parse(BStr::new(data)).map_err(|e| ObjectError::InvalidSignature(e.to_string()))
}
