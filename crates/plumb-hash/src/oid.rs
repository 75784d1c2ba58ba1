use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string};
use crate::{HashError, DIGEST_LEN, HEX_LEN};

/// An object identifier: the raw 20-byte SHA-1 digest of an object's framed bytes.
///
/// Stored inline; trees embed these bytes verbatim, everything user-facing
/// (commit payloads, CLI output, file names) uses the lowercase hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; DIGEST_LEN]);

impl ObjectId {
    /// The null (all-zeros) id.
    pub const NULL: Self = Self([0u8; DIGEST_LEN]);

    /// Wrap an already-computed digest.
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Create an ObjectId from a raw byte slice, which must be exactly 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; DIGEST_LEN] =
            bytes
                .try_into()
                .map_err(|_| HashError::InvalidHashLength {
                    expected: DIGEST_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Create an ObjectId from a 40-character hex string (either case).
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        if hex.len() != HEX_LEN {
            return Err(HashError::InvalidHexLength {
                expected: HEX_LEN,
                actual: hex.len(),
            });
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the hex string representation (lowercase).
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// Split the hex form into the bucket directory name (first two
    /// characters) and the entry file name (remaining 38).
    pub fn bucket_and_entry(&self) -> (String, String) {
        let mut hex = self.to_hex();
        let entry = hex.split_off(2);
        (hex, entry)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_HEX: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    #[test]
    fn from_hex_parses_forty_chars() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        assert_eq!(oid.as_bytes().len(), 20);
        assert_eq!(oid.as_bytes()[0], 0xce);
    }

    #[test]
    fn display_roundtrip() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        let displayed = oid.to_string();
        assert_eq!(displayed, HELLO_HEX);
        let parsed: ObjectId = displayed.parse().unwrap();
        assert_eq!(parsed, oid);
    }

    #[test]
    fn debug_shows_short_hash() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        assert_eq!(format!("{:?}", oid), "ObjectId(ce013625)");
    }

    #[test]
    fn ordering_is_bytewise() {
        let a = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
        let b = ObjectId::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }

    #[test]
    fn null_sorts_first() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        assert!(ObjectId::NULL < oid);
        assert_eq!(ObjectId::NULL.to_hex(), "0".repeat(40));
    }

    #[test]
    fn from_bytes_wrong_length() {
        let err = ObjectId::from_bytes(&[0; 10]).unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidHashLength {
                expected: 20,
                actual: 10
            }
        ));
    }

    #[test]
    fn invalid_hex_chars() {
        let err = ObjectId::from_hex("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").unwrap_err();
        assert!(matches!(err, HashError::InvalidHex { position: 0, .. }));
    }

    #[test]
    fn invalid_hex_length() {
        let err = ObjectId::from_hex("abcd").unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidHexLength {
                expected: 40,
                actual: 4
            }
        ));
    }

    #[test]
    fn uppercase_hex_accepted() {
        let lower = ObjectId::from_hex(HELLO_HEX).unwrap();
        let upper = ObjectId::from_hex(&HELLO_HEX.to_ascii_uppercase()).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn bucket_split() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        let (bucket, entry) = oid.bucket_and_entry();
        assert_eq!(bucket, "ce");
        assert_eq!(entry, &HELLO_HEX[2..]);
    }
}
