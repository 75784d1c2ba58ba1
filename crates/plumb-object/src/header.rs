use crate::{ObjectError, ObjectKind};

/// Frame a payload: `"<kind> <len>\0" + payload`.
///
/// `len` is the exact byte length of `payload` in decimal with no leading zeros.
pub fn frame(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let hdr = write_header(kind, payload.len());
    let mut out = Vec::with_capacity(hdr.len() + payload.len());
    out.extend_from_slice(&hdr);
    out.extend_from_slice(payload);
    out
}

/// Write an object header: `"<kind> <len>\0"`.
pub fn write_header(kind: ObjectKind, content_size: usize) -> Vec<u8> {
    format!("{} {}\0", kind, content_size).into_bytes()
}

/// Parse an object header from framed bytes.
///
/// Returns `(kind, payload_length, payload_offset)` where `payload_offset`
/// points just past the null terminator. The prefix before the first null
/// must split into exactly two space-separated tokens.
pub fn parse_header(data: &[u8]) -> Result<(ObjectKind, usize, usize), ObjectError> {
    let null_pos = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ObjectError::malformed("missing null terminator in header"))?;

    let header = &data[..null_pos];
    let mut tokens = header.split(|&b| b == b' ');
    let (kind_bytes, size_bytes) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(kind), Some(size), None) => (kind, size),
        _ => {
            return Err(ObjectError::malformed(format!(
                "header must be '<kind> <length>', got {:?}",
                String::from_utf8_lossy(header)
            )))
        }
    };

    let kind = ObjectKind::from_bytes(kind_bytes)?;

    if size_bytes.is_empty() || !size_bytes.iter().all(u8::is_ascii_digit) {
        return Err(ObjectError::malformed(format!(
            "invalid length: {:?}",
            String::from_utf8_lossy(size_bytes)
        )));
    }
    // Digits only, so the only possible failure is overflow.
    let content_size: usize = std::str::from_utf8(size_bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ObjectError::malformed("length overflows"))?;

    Ok((kind, content_size, null_pos + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_hello() {
        assert_eq!(frame(ObjectKind::Blob, b"hello\n"), b"blob 6\0hello\n");
    }

    #[test]
    fn frame_empty_payload() {
        assert_eq!(frame(ObjectKind::Tree, b""), b"tree 0\0");
    }

    #[test]
    fn parse_blob_header() {
        let data = b"blob 12\0hello world!";
        let (kind, size, offset) = parse_header(data).unwrap();
        assert_eq!(kind, ObjectKind::Blob);
        assert_eq!(size, 12);
        assert_eq!(offset, 8);
        assert_eq!(&data[offset..], b"hello world!");
    }

    #[test]
    fn payload_may_contain_nulls() {
        let framed = frame(ObjectKind::Blob, b"a\0b");
        let (_, size, offset) = parse_header(&framed).unwrap();
        assert_eq!(size, 3);
        assert_eq!(&framed[offset..], b"a\0b");
    }

    #[test]
    fn write_and_parse_roundtrip() {
        let hdr = write_header(ObjectKind::Commit, 42);
        let (kind, size, len) = parse_header(&hdr).unwrap();
        assert_eq!(kind, ObjectKind::Commit);
        assert_eq!(size, 42);
        assert_eq!(len, hdr.len());
    }

    #[test]
    fn missing_null_is_malformed() {
        assert!(matches!(
            parse_header(b"blob 12"),
            Err(ObjectError::Malformed { .. })
        ));
    }

    #[test]
    fn wrong_token_count_is_malformed() {
        assert!(matches!(
            parse_header(b"blob12\0"),
            Err(ObjectError::Malformed { .. })
        ));
        assert!(matches!(
            parse_header(b"blob 1 2\0"),
            Err(ObjectError::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_kind_is_unsupported() {
        assert!(matches!(
            parse_header(b"tag 12\0"),
            Err(ObjectError::UnsupportedKind(_))
        ));
    }

    #[test]
    fn bad_length_is_malformed() {
        for bad in [&b"blob abc\0"[..], b"blob -1\0", b"blob +1\0", b"blob \0"] {
            assert!(
                matches!(parse_header(bad), Err(ObjectError::Malformed { .. })),
                "accepted {:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn overflowing_length_is_malformed() {
        assert!(matches!(
            parse_header(b"blob 99999999999999999999999999\0"),
            Err(ObjectError::Malformed { .. })
        ));
    }
}
