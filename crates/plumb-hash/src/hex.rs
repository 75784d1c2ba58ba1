//! Lowercase hex encoding for object ids.

use crate::HashError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Lowercase hex of `bytes`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|&b| [HEX_DIGITS[(b >> 4) as usize], HEX_DIGITS[(b & 0x0f) as usize]])
        .map(char::from)
        .collect()
}

/// Decode `hex` into `buf`; `hex` must be exactly twice as long as `buf`.
/// Either case is accepted.
pub fn hex_decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (i, (pair, out)) in hex.chunks_exact(2).zip(buf.iter_mut()).enumerate() {
        let digit = |offset: usize| {
            nibble(pair[offset]).ok_or(HashError::InvalidHex {
                position: i * 2 + offset,
                character: pair[offset] as char,
            })
        };
        *out = (digit(0)? << 4) | digit(1)?;
    }
    Ok(())
}
